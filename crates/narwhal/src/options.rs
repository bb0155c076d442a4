use serde::{Deserialize, Serialize};

/// Serializable pipeline configuration, with operators selected by name.
///
/// Names follow the `name` / `name(arg, ...)` grammar of the stage `FromStr` impls, e.g.
/// `"coffman-graham(3)"` or `"two-layer(mean, 8)"`. See [`Sugiyama::from_options`].
///
/// [`Sugiyama::from_options`]: crate::Sugiyama::from_options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutOptions {
    #[serde(default = "default_layering")]
    pub layering: String,
    #[serde(default = "default_decross")]
    pub decross: String,
    #[serde(default = "default_coord")]
    pub coord: String,
    #[serde(default)]
    pub size: Option<[f64; 2]>,
    #[serde(rename = "dummySize")]
    #[serde(default)]
    pub dummy_size: Option<[f64; 2]>,
    #[serde(default)]
    pub debug: bool,
}

fn default_layering() -> String {
    "simplex".to_string()
}

fn default_decross() -> String {
    "two-layer".to_string()
}

fn default_coord() -> String {
    "vert".to_string()
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            layering: default_layering(),
            decross: default_decross(),
            coord: default_coord(),
            size: None,
            dummy_size: None,
            debug: false,
        }
    }
}
