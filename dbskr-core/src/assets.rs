//! CDN and image assets
//!
//! An [`Asset`] is a remote image addressed as `{base}{path}.{format}`,
//! optionally followed by a query string. Bot avatars on Koreanbots point at
//! the Discord CDN, UniqueBots hands out full image URLs.

use crate::error::{BotListError, BotListResult};
use crate::transport::{ApiRequest, Transport};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, instrument};
use twilight_model::id::{marker::UserMarker, Id};
use url::Url;

/// Base URL of the Discord CDN
pub const DISCORD_CDN_BASE: &str = "https://cdn.discordapp.com";

/// Image formats an asset can be requested in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetFormat {
    Png,
    Jpg,
    Jpeg,
    Webp,
    Gif,
    Svg,
}

impl AssetFormat {
    /// File extension used in URLs
    pub fn extension(&self) -> &'static str {
        match self {
            AssetFormat::Png => "png",
            AssetFormat::Jpg => "jpg",
            AssetFormat::Jpeg => "jpeg",
            AssetFormat::Webp => "webp",
            AssetFormat::Gif => "gif",
            AssetFormat::Svg => "svg",
        }
    }
}

impl fmt::Display for AssetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl std::str::FromStr for AssetFormat {
    type Err = BotListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "png" => Ok(AssetFormat::Png),
            "jpg" => Ok(AssetFormat::Jpg),
            "jpeg" => Ok(AssetFormat::Jpeg),
            "webp" => Ok(AssetFormat::Webp),
            "gif" => Ok(AssetFormat::Gif),
            "svg" => Ok(AssetFormat::Svg),
            other => Err(BotListError::invalid_argument(format!(
                "Unsupported image format: {}",
                other
            ))),
        }
    }
}

/// A remote image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    base: String,
    path: String,
    /// Query string copied as-is from an image URL
    raw_query: Option<String>,
    query: Vec<(String, String)>,
    formats: Vec<AssetFormat>,
}

impl Asset {
    /// Create an asset; the first format is used when none is requested
    pub fn new(
        base: impl Into<String>,
        path: impl Into<String>,
        formats: Vec<AssetFormat>,
    ) -> BotListResult<Self> {
        if formats.is_empty() {
            return Err(BotListError::invalid_argument(
                "An asset needs at least one supported format",
            ));
        }

        Ok(Self {
            base: base.into(),
            path: path.into(),
            raw_query: None,
            query: Vec::new(),
            formats,
        })
    }

    /// Asset offered in exactly one format
    pub fn single(base: impl Into<String>, path: impl Into<String>, format: AssetFormat) -> Self {
        Self {
            base: base.into(),
            path: path.into(),
            raw_query: None,
            query: Vec::new(),
            formats: vec![format],
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Avatar of a Discord user on the CDN
    ///
    /// Animated avatars (hash starting with `a_`) also offer `gif`, which
    /// becomes their default format.
    pub fn discord_avatar(
        user_id: Id<UserMarker>,
        avatar_hash: &str,
        size: Option<u16>,
    ) -> BotListResult<Self> {
        let formats = if avatar_hash.starts_with("a_") {
            vec![
                AssetFormat::Gif,
                AssetFormat::Png,
                AssetFormat::Jpg,
                AssetFormat::Webp,
            ]
        } else {
            vec![AssetFormat::Png, AssetFormat::Jpg, AssetFormat::Webp]
        };

        let asset = Self::new(
            DISCORD_CDN_BASE,
            format!("/avatars/{}/{}", user_id, avatar_hash),
            formats,
        )?;

        match size {
            Some(size) if !(16..=4096).contains(&size) || !size.is_power_of_two() => {
                Err(BotListError::invalid_argument(format!(
                    "size must be a power of 2 between 16 and 4096, got {}",
                    size
                )))
            }
            Some(size) => Ok(asset.with_query("size", size)),
            None => Ok(asset),
        }
    }

    /// Asset from a complete image URL; its extension is the only supported format
    pub fn from_image_url(image_url: &str) -> BotListResult<Self> {
        let parsed = Url::parse(image_url).map_err(|e| {
            BotListError::invalid_argument(format!("Invalid image URL {}: {}", image_url, e))
        })?;

        let (stem, extension) = parsed
            .path()
            .rsplit_once('.')
            .filter(|(_, ext)| !ext.contains('/'))
            .ok_or_else(|| {
                BotListError::invalid_argument(format!("Image URL has no extension: {}", image_url))
            })?;
        let format: AssetFormat = extension.parse()?;

        let mut asset = Self::single(parsed.origin().ascii_serialization(), stem, format);
        asset.raw_query = parsed.query().map(str::to_owned);
        Ok(asset)
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn formats(&self) -> &[AssetFormat] {
        &self.formats
    }

    pub fn default_format(&self) -> AssetFormat {
        self.formats[0]
    }

    pub fn supports(&self, format: AssetFormat) -> bool {
        self.formats.contains(&format)
    }

    /// Build the URL, defaulting to the first supported format
    pub fn url(&self, format: Option<AssetFormat>) -> BotListResult<String> {
        match format {
            None => Ok(self.default_url()),
            Some(f) if self.supports(f) => Ok(self.build_url(f)),
            Some(f) => {
                let supported: Vec<&str> = self.formats.iter().map(AssetFormat::extension).collect();
                Err(BotListError::invalid_argument(format!(
                    "format {} must be one of {:?}",
                    f, supported
                )))
            }
        }
    }

    /// URL in the default format
    pub fn default_url(&self) -> String {
        self.build_url(self.default_format())
    }

    fn build_url(&self, format: AssetFormat) -> String {
        let mut url = format!("{}{}.{}", self.base, self.path, format.extension());
        let mut separator = '?';
        if let Some(raw) = &self.raw_query {
            url.push(separator);
            url.push_str(raw);
            separator = '&';
        }
        if !self.query.is_empty() {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(&self.query)
                .finish();
            url.push(separator);
            url.push_str(&query);
        }
        url
    }

    /// Download the asset
    #[instrument(skip(self, transport))]
    pub async fn read(
        &self,
        transport: &dyn Transport,
        format: Option<AssetFormat>,
    ) -> BotListResult<Vec<u8>> {
        let url = self.url(format)?;
        debug!("Downloading asset: {}", url);
        transport.send(ApiRequest::get(url)).await?.into_bytes()
    }

    /// Download the asset into a file, returning the number of bytes written
    pub async fn save(
        &self,
        transport: &dyn Transport,
        format: Option<AssetFormat>,
        path: impl AsRef<Path>,
    ) -> BotListResult<usize> {
        let data = self.read(transport, format).await?;
        tokio::fs::write(path.as_ref(), &data).await.map_err(|e| {
            BotListError::io(format!("Failed to write {}: {}", path.as_ref().display(), e))
        })?;
        Ok(data.len())
    }

    /// Download the asset into `writer`, returning the number of bytes written
    pub async fn write_to<W>(
        &self,
        transport: &dyn Transport,
        format: Option<AssetFormat>,
        writer: &mut W,
    ) -> BotListResult<usize>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let data = self.read(transport, format).await?;
        writer
            .write_all(&data)
            .await
            .map_err(|e| BotListError::io(format!("Failed to write asset: {}", e)))?;
        writer
            .flush()
            .await
            .map_err(|e| BotListError::io(format!("Failed to flush asset: {}", e)))?;
        Ok(data.len())
    }
}
