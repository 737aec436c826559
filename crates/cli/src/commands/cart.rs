//! Cart editing commands.
//!
//! # Usage
//!
//! ```bash
//! # Add a product (numeric ids stay numeric)
//! basket add --id 1 --price 10 --name "Pineapple Tee"
//!
//! # Adjust and inspect
//! basket inc 1
//! basket dec 1
//! basket show
//!
//! # Move a cart between slots
//! basket export > cart.json
//! basket --key other import cart.json
//! ```
//!
//! # Environment Variables
//!
//! - `BASKET_STORAGE_KEY` - Slot name (default: `my-cart`)
//! - `BASKET_STORAGE_DIR` - Directory holding the slots (default: `.basket`)

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use basket_core::{Price, Product, ProductId};
use basket_store::{
    CartConfig, CartStore, ConfigError, FileStorage, SnapshotError, StorageError,
};
use thiserror::Error;

/// Directory used when neither `--dir` nor `BASKET_STORAGE_DIR` is set.
pub const DEFAULT_DIR: &str = ".basket";

/// Errors that can occur while running a cart command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Storage directory could not be opened.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Cart could not be encoded.
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// Import file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Import file is not a cart snapshot.
    #[error("Not a cart snapshot: {}", .0.display())]
    InvalidSnapshot(PathBuf),
}

/// Open the cart slot, applying command-line overrides on top of the
/// environment.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the directory cannot be
/// created.
pub fn open(
    dir: Option<PathBuf>,
    key: Option<String>,
) -> Result<CartStore<FileStorage>, CommandError> {
    let mut config = CartConfig::from_env()?;
    if let Some(key) = key {
        config = config.with_storage_key(key);
    }
    let dir = dir
        .or_else(|| config.storage_dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DIR));

    let storage = FileStorage::open(&dir)?;
    storage.path_for(&config.storage_key)?;
    tracing::debug!(dir = %storage.dir().display(), key = %config.storage_key, "Opening cart");

    Ok(CartStore::open(config, Some(storage)))
}

/// Add one unit of a product.
pub fn add(
    cart: &mut CartStore<FileStorage>,
    id: ProductId,
    price: Price,
    name: Option<String>,
    fields: Vec<(String, String)>,
) {
    let mut product = Product::new(id, price);
    if let Some(name) = name {
        product = product.with_field("name", name);
    }
    for (key, value) in fields {
        product = product.with_field(&key, value);
    }
    cart.add_to_cart(product);
}

/// Render the cart as a table with totals.
#[must_use]
pub fn render(cart: &CartStore<FileStorage>) -> String {
    let mut out = String::new();
    if cart.is_empty() {
        out.push_str("Cart is empty\n");
    }
    for item in cart.items() {
        let name = item.field_str("name").unwrap_or("-");
        let _ = writeln!(
            out,
            "{:<12} {:<24} x{:<5} {:>10} {:>12}",
            item.id.to_string(),
            name,
            item.quantity,
            item.price.to_string(),
            format!("{:.2}", item.line_total()),
        );
    }
    let _ = writeln!(out, "Items: {}", cart.item_count());
    let _ = writeln!(out, "Total: {:.2}", cart.total_price());
    out
}

/// The raw persisted snapshot.
///
/// # Errors
///
/// Returns an error if the cart cannot be encoded.
pub fn export(cart: &CartStore<FileStorage>) -> Result<String, CommandError> {
    Ok(cart.snapshot()?)
}

/// Replace the cart with the snapshot stored in `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a snapshot. The cart
/// is left unchanged in that case.
pub fn import(cart: &mut CartStore<FileStorage>, path: &Path) -> Result<(), CommandError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CommandError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if !cart.restore(&raw) {
        return Err(CommandError::InvalidSnapshot(path.to_path_buf()));
    }
    tracing::info!(lines = cart.len(), "Cart imported");
    Ok(())
}

/// Parse a `key=value` display field.
///
/// # Errors
///
/// Returns a message if there is no `=` or the key is empty.
pub fn parse_field(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_owned(), value.to_owned())),
        _ => Err(format!("expected key=value, got {s:?}")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn temp_cart() -> (PathBuf, CartStore<FileStorage>) {
        let dir = std::env::temp_dir().join(format!("basket-cli-{}", uuid::Uuid::new_v4()));
        let cart = open(Some(dir.clone()), Some("test-cart".to_string())).unwrap();
        (dir, cart)
    }

    #[test]
    fn test_parse_field() {
        assert_eq!(
            parse_field("color=red").unwrap(),
            ("color".to_string(), "red".to_string())
        );
        assert_eq!(parse_field("note=a=b").unwrap().1, "a=b");
        assert!(parse_field("novalue").is_err());
        assert!(parse_field("=x").is_err());
    }

    #[test]
    fn test_add_and_render() {
        let (dir, mut cart) = temp_cart();
        let price: Price = "10".parse().unwrap();
        add(&mut cart, ProductId::from(1), price, Some("Tee".to_string()), vec![]);
        add(&mut cart, ProductId::from(1), price, None, vec![]);

        let table = render(&cart);
        assert!(table.contains("Tee"));
        assert!(table.contains("x2"));
        assert!(table.contains("Items: 2"));
        assert!(table.contains("Total: 20.00"));

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_render_empty() {
        let (dir, cart) = temp_cart();
        let table = render(&cart);
        assert!(table.starts_with("Cart is empty"));
        assert!(table.contains("Total: 0.00"));
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_changes_survive_reopen() {
        let (dir, mut cart) = temp_cart();
        add(
            &mut cart,
            ProductId::from("cap"),
            "4.5".parse().unwrap(),
            None,
            vec![("color".to_string(), "red".to_string())],
        );
        drop(cart);

        let reopened = open(Some(dir.clone()), Some("test-cart".to_string())).unwrap();
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.items()[0].field_str("color"), Some("red"));

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_import_rejects_bad_file() {
        let (dir, mut cart) = temp_cart();
        let bad = dir.join("bad.txt");
        std::fs::write(&bad, "nope").unwrap();

        assert!(matches!(
            import(&mut cart, &bad),
            Err(CommandError::InvalidSnapshot(_))
        ));
        assert!(matches!(
            import(&mut cart, &dir.join("missing.json")),
            Err(CommandError::Read { .. })
        ));

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_export_import_between_slots() {
        let (dir, mut cart) = temp_cart();
        add(&mut cart, ProductId::from(1), "10".parse().unwrap(), None, vec![]);
        let exported = dir.join("export.json");
        std::fs::write(&exported, export(&cart).unwrap()).unwrap();

        let mut other = open(Some(dir.clone()), Some("other".to_string())).unwrap();
        import(&mut other, &exported).unwrap();
        assert_eq!(other.items(), cart.items());

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_invalid_key_rejected() {
        let dir = std::env::temp_dir().join(format!("basket-cli-{}", uuid::Uuid::new_v4()));
        let result = open(Some(dir.clone()), Some("../escape".to_string()));
        assert!(matches!(result, Err(CommandError::Storage(_))));
        let _ = std::fs::remove_dir_all(dir);
    }
}
