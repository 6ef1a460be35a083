//! Secret vault commands: keygen, seal, open.

use crate::cli::output;
use crate::core::config::Config;
use crate::core::keystore::KeyStore;
use crate::core::vault::{self, Encoding};
use crate::error::Result;

/// Generate and store a fresh secret key.
pub fn keygen(force: bool) -> Result<i32> {
    let config = Config::load()?;
    let path = KeyStore::key_path(&config)?;
    KeyStore::generate(&path, force)?;

    output::success("secret key generated");
    output::kv("path:", output::path(&path.display().to_string()));
    output::hint(&format!(
        "or export {} to override it",
        crate::core::constants::SECRETS_KEY_ENV
    ));
    Ok(0)
}

/// Seal a value and print it.
pub fn seal(value: &str, hex: bool) -> Result<i32> {
    let key = KeyStore::resolve(&Config::load()?)?;
    let encoding = if hex { Encoding::Hex } else { Encoding::Base64 };
    println!("{}", vault::seal_with(value, &key, encoding)?);
    Ok(0)
}

/// Open a sealed value and print the plaintext.
pub fn open(sealed: &str) -> Result<i32> {
    let key = KeyStore::resolve(&Config::load()?)?;
    let plaintext = zeroize::Zeroizing::new(vault::open(sealed, &key)?);
    println!("{}", plaintext.as_str());
    Ok(0)
}
