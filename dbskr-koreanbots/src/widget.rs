//! Koreanbots widget images
//!
//! Widgets are SVG badges rendered by Koreanbots. Building one never touches
//! the network; only [`Widget::read`] downloads the image.

use dbskr_core::{Asset, AssetFormat, BotListError, BotListResult, Transport, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::path::Path;

/// Base URL of the widget renderer
pub const WIDGET_BASE: &str = "https://koreanbots.dev/api/widget";

/// Scales accepted by the renderer
pub const WIDGET_SCALE_RANGE: RangeInclusive<f32> = 0.5..=3.0;

/// What the widget shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetType {
    Votes,
    Servers,
    Status,
}

impl WidgetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetType::Votes => "votes",
            WidgetType::Servers => "servers",
            WidgetType::Status => "status",
        }
    }
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetStyle {
    Flat,
    Classic,
}

impl WidgetStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetStyle::Flat => "flat",
            WidgetStyle::Classic => "classic",
        }
    }
}

impl fmt::Display for WidgetStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bot widget
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Widget {
    widget_type: WidgetType,
    bot_id: UserId,
    style: Option<WidgetStyle>,
    scale: Option<f32>,
    icon: Option<bool>,
}

impl Widget {
    pub fn new(widget_type: WidgetType, bot_id: UserId) -> Self {
        Self {
            widget_type,
            bot_id,
            style: None,
            scale: None,
            icon: None,
        }
    }

    pub fn with_style(mut self, style: WidgetStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn with_scale(mut self, scale: f32) -> BotListResult<Self> {
        if !WIDGET_SCALE_RANGE.contains(&scale) {
            return Err(BotListError::invalid_argument(format!(
                "widget scale must be between {} and {}, got {}",
                WIDGET_SCALE_RANGE.start(),
                WIDGET_SCALE_RANGE.end(),
                scale
            )));
        }
        self.scale = Some(scale);
        Ok(self)
    }

    pub fn with_icon(mut self, icon: bool) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn widget_type(&self) -> WidgetType {
        self.widget_type
    }

    pub fn bot_id(&self) -> UserId {
        self.bot_id
    }

    pub fn style(&self) -> Option<WidgetStyle> {
        self.style
    }

    pub fn scale(&self) -> Option<f32> {
        self.scale
    }

    pub fn icon(&self) -> Option<bool> {
        self.icon
    }

    /// The widget as a downloadable asset
    pub fn asset(&self) -> Asset {
        let mut asset = Asset::single(
            WIDGET_BASE,
            format!("/bots/{}/{}", self.widget_type, self.bot_id),
            AssetFormat::Svg,
        );
        if let Some(style) = self.style {
            asset = asset.with_query("style", style);
        }
        if let Some(scale) = self.scale {
            asset = asset.with_query("scale", scale);
        }
        if let Some(icon) = self.icon {
            asset = asset.with_query("icon", icon);
        }
        asset
    }

    pub fn url(&self) -> String {
        self.asset().default_url()
    }

    /// Download the rendered SVG
    pub async fn read(&self, transport: &dyn Transport) -> BotListResult<Vec<u8>> {
        self.asset().read(transport, None).await
    }

    pub async fn save(&self, transport: &dyn Transport, path: impl AsRef<Path>) -> BotListResult<usize> {
        self.asset().save(transport, None, path).await
    }

    pub async fn write_to<W>(&self, transport: &dyn Transport, writer: &mut W) -> BotListResult<usize>
    where
        W: tokio::io::AsyncWrite + Unpin + ?Sized,
    {
        self.asset().write_to(transport, None, writer).await
    }
}

impl fmt::Display for Widget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbskr_core::mock::MockTransport;
    use dbskr_core::{ApiResponse, Id};

    #[test]
    fn test_plain_widget_url() {
        let widget = Widget::new(WidgetType::Votes, Id::new(653534001742741552));
        assert_eq!(
            widget.url(),
            "https://koreanbots.dev/api/widget/bots/votes/653534001742741552.svg"
        );
    }

    #[test]
    fn test_widget_options() {
        let widget = Widget::new(WidgetType::Servers, Id::new(10))
            .with_style(WidgetStyle::Classic)
            .with_scale(1.5)
            .unwrap()
            .with_icon(false);
        assert_eq!(
            widget.url(),
            "https://koreanbots.dev/api/widget/bots/servers/10.svg?style=classic&scale=1.5&icon=false"
        );
        assert_eq!(widget.to_string(), widget.url());
    }

    #[test]
    fn test_scale_out_of_range() {
        for scale in [0.1, 3.5, f32::NAN] {
            let err = Widget::new(WidgetType::Status, Id::new(10))
                .with_scale(scale)
                .unwrap_err();
            assert!(matches!(err, BotListError::InvalidArgument(_)));
        }
    }

    #[tokio::test]
    async fn test_write_to_stream() {
        let svg = b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>".to_vec();
        let transport = MockTransport::always(ApiResponse::new(200, svg.clone()));
        let widget = Widget::new(WidgetType::Status, Id::new(10));

        let mut sink: Vec<u8> = Vec::new();
        assert_eq!(widget.write_to(&transport, &mut sink).await.unwrap(), svg.len());
        assert_eq!(sink, svg);
        assert_eq!(
            transport.last_request().unwrap().url,
            "https://koreanbots.dev/api/widget/bots/status/10.svg"
        );
    }
}
