//! Client for the Gemini "nano-banana" image generation models
//!
//! Builds `generateContent` requests from a prompt and an optional input
//! image, extracts the generated image from the response, and optionally
//! writes it to a storage disk.
//!
//! ```no_run
//! use gemini_nano::{Client, Config, GenerateOptions, ImageStore};
//!
//! # async fn run() -> gemini_nano::Result<()> {
//! let config = Config::from_env()?;
//! let client = Client::factory().make(&config);
//! let store = ImageStore::from_config(&config).await?;
//!
//! let response = client
//!     .images()
//!     .generate("A banana wearing sunglasses", GenerateOptions::new())
//!     .await?;
//! println!("{}", response.result(&store).await?);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod gemini;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
pub use gemini::{Client, ClientFactory, GenerateOptions, GenerateResponse, Images};
pub use storage::{ImageStore, StorageDisk};
