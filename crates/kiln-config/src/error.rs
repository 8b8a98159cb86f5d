use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "Inventory file not found. Looked in:\n\
        - the current directory: inventory.yml, inventory.yaml\n\
        - the ./.kiln/ directory\n\
        Set KILN_INVENTORY_PATH or pass --inventory to point at it directly"
    )]
    InventoryNotFound,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
