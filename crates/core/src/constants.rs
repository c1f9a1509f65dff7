//! Constants used throughout the catalog core crate.
//!
//! Path and filename constants live here so the on-disk layout is defined in one place.

/// Default directory for the document store when no explicit directory is configured.
pub const DEFAULT_DATA_DIR: &str = "catalog_data";

/// Default HTTP listening port.
pub const DEFAULT_PORT: u16 = 5000;

/// Directory name for the recipe collection.
pub const RECIPES_DIR_NAME: &str = "recipes";

/// Directory name for the ingredient collection.
pub const INGREDIENTS_DIR_NAME: &str = "ingredients";

/// Directory name for the recipe-ingredient collection.
pub const RECIPE_INGREDIENTS_DIR_NAME: &str = "recipe_ingredients";

/// Filename of the JSON document inside each sharded document directory.
pub const DOCUMENT_FILENAME: &str = "document.json";

/// Suffix for the temporary file a document is written to before being renamed into place.
pub const DOCUMENT_TEMP_SUFFIX: &str = "tmp";
