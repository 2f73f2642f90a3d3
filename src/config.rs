//! Viewer configuration and command-line arguments

use clap::Parser;

/// Product list endpoint used when none is given
pub const DEFAULT_ENDPOINT: &str = "https://immersive-commerce.vercel.app/api/models";

/// Runtime settings for one viewer session
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub endpoint: String,
    pub window_width: u32,
    pub window_height: u32,
    /// UI font size in pixels
    pub font_size: f32,
    /// Vertical field of view in degrees
    pub fovy_degrees: f32,
    pub user_agent: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            window_width: 1200,
            window_height: 800,
            font_size: 20.0,
            fovy_degrees: 85.0,
            user_agent: format!("vitrine/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ViewerConfig {
    /// HTTP client shared by the catalog fetch and model downloads
    pub fn http_client(&self) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(&self.user_agent)
            .build()
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Browse a product catalog and inspect each product's 3D model")]
pub struct ViewerArgs {
    /// Product list endpoint (JSON array of products)
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Initial window width in logical pixels
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Initial window height in logical pixels
    #[arg(long, default_value_t = 800)]
    pub height: u32,

    /// UI font size in pixels
    #[arg(long, default_value_t = 20.0)]
    pub font_size: f32,
}

impl From<ViewerArgs> for ViewerConfig {
    fn from(args: ViewerArgs) -> Self {
        Self {
            endpoint: args.endpoint,
            window_width: args.width.max(1),
            window_height: args.height.max(1),
            font_size: args.font_size,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults_match_config_defaults() {
        let args = ViewerArgs::try_parse_from(["vitrine"]).unwrap();
        assert_eq!(ViewerConfig::from(args), ViewerConfig::default());
    }

    #[test]
    fn test_args_override() {
        let args = ViewerArgs::try_parse_from([
            "vitrine",
            "--endpoint",
            "http://localhost:3000/api/models",
            "--width",
            "640",
            "--height",
            "0",
            "--font-size",
            "14",
        ])
        .unwrap();
        let config = ViewerConfig::from(args);

        assert_eq!(config.endpoint, "http://localhost:3000/api/models");
        assert_eq!(config.window_width, 640);
        assert_eq!(config.window_height, 1);
        assert_eq!(config.font_size, 14.0);
        assert_eq!(config.fovy_degrees, 85.0);
    }

    #[test]
    fn test_http_client_builds() {
        assert!(ViewerConfig::default().http_client().is_ok());
    }
}
