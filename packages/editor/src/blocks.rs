//! # Block Variants
//!
//! The closed set of block shapes a document can hold.
//!
//! Every block carries the same common fields (id, title, visibility,
//! column layout, style map) plus a [`BlockContent`] payload whose shape is
//! fixed by its variant. The payload is a sum type, so a block can never
//! carry fields belonging to another variant, and every mutation site has
//! to match on it exhaustively.
//!
//! ## Serialized form
//!
//! ```text
//! { "id": "text-1", "title": "Text", "visible": true, "columns": "full",
//!   "style": {}, "type": "text", "body": "Start writing..." }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::mutations::MutationError;

pub type BlockId = String;

/// Free-form style properties (`"backgroundColor" -> "#fff"`, `"paddingTop" -> 24`)
pub type StyleMap = BTreeMap<String, Value>;

/// Variant tag of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockType {
    Hero,
    Text,
    Features,
    Benefits,
    Specifications,
    Image,
    Gallery,
    ImageText,
    TextImage,
    Video,
    Faq,
    Cta,
}

impl BlockType {
    /// Every block type, in block-library order
    pub const ALL: [BlockType; 12] = [
        BlockType::Hero,
        BlockType::Text,
        BlockType::Features,
        BlockType::Benefits,
        BlockType::Specifications,
        BlockType::Image,
        BlockType::Gallery,
        BlockType::ImageText,
        BlockType::TextImage,
        BlockType::Video,
        BlockType::Faq,
        BlockType::Cta,
    ];

    /// Wire tag (`"imageText"`, `"faq"`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Hero => "hero",
            BlockType::Text => "text",
            BlockType::Features => "features",
            BlockType::Benefits => "benefits",
            BlockType::Specifications => "specifications",
            BlockType::Image => "image",
            BlockType::Gallery => "gallery",
            BlockType::ImageText => "imageText",
            BlockType::TextImage => "textImage",
            BlockType::Video => "video",
            BlockType::Faq => "faq",
            BlockType::Cta => "cta",
        }
    }

    /// Human label, also used as the default block title
    pub fn label(&self) -> &'static str {
        match self {
            BlockType::Hero => "Hero",
            BlockType::Text => "Text",
            BlockType::Features => "Features",
            BlockType::Benefits => "Benefits",
            BlockType::Specifications => "Specifications",
            BlockType::Image => "Image",
            BlockType::Gallery => "Gallery",
            BlockType::ImageText => "Image & Text",
            BlockType::TextImage => "Text & Image",
            BlockType::Video => "Video",
            BlockType::Faq => "FAQ",
            BlockType::Cta => "Call to Action",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = MutationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockType::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| MutationError::UnknownBlockType(s.to_string()))
    }
}

/// Column layout of a block within the page grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Columns {
    #[default]
    Full,
    Half,
    Third,
    Quarter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroContent {
    pub heading: String,
    pub subheading: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    pub button_text: String,
    pub button_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContent {
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureItem {
    pub icon: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturesContent {
    pub items: Vec<FeatureItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitsContent {
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecRow {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecificationsContent {
    pub rows: Vec<SpecRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    pub alt: String,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub src: String,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryContent {
    pub images: Vec<GalleryImage>,
}

/// Shared shape of the `imageText` and `textImage` variants; the variant
/// decides which side the image renders on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaTextContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_src: Option<String>,
    pub image_alt: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoContent {
    pub url: String,
    pub autoplay: bool,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqContent {
    pub items: Vec<FaqItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CtaContent {
    pub heading: String,
    pub body: String,
    pub button_text: String,
    pub button_url: String,
}

/// Variant-specific payload, tagged by `type`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BlockContent {
    Hero(HeroContent),
    Text(TextContent),
    Features(FeaturesContent),
    Benefits(BenefitsContent),
    Specifications(SpecificationsContent),
    Image(ImageContent),
    Gallery(GalleryContent),
    ImageText(MediaTextContent),
    TextImage(MediaTextContent),
    Video(VideoContent),
    Faq(FaqContent),
    Cta(CtaContent),
}

impl BlockContent {
    pub fn block_type(&self) -> BlockType {
        match self {
            BlockContent::Hero(_) => BlockType::Hero,
            BlockContent::Text(_) => BlockType::Text,
            BlockContent::Features(_) => BlockType::Features,
            BlockContent::Benefits(_) => BlockType::Benefits,
            BlockContent::Specifications(_) => BlockType::Specifications,
            BlockContent::Image(_) => BlockType::Image,
            BlockContent::Gallery(_) => BlockType::Gallery,
            BlockContent::ImageText(_) => BlockType::ImageText,
            BlockContent::TextImage(_) => BlockType::TextImage,
            BlockContent::Video(_) => BlockType::Video,
            BlockContent::Faq(_) => BlockType::Faq,
            BlockContent::Cta(_) => BlockType::Cta,
        }
    }

    /// Placeholder content shown when a block is first dropped in
    pub fn default_for(kind: BlockType) -> Self {
        match kind {
            BlockType::Hero => BlockContent::Hero(HeroContent {
                heading: "Your headline".to_string(),
                subheading: "Supporting text".to_string(),
                background_image: None,
                button_text: "Get started".to_string(),
                button_url: "#".to_string(),
            }),
            BlockType::Text => BlockContent::Text(TextContent {
                body: "Start writing...".to_string(),
            }),
            BlockType::Features => BlockContent::Features(FeaturesContent {
                items: (1..=3)
                    .map(|n| FeatureItem {
                        icon: "star".to_string(),
                        title: format!("Feature {n}"),
                        description: "Describe this feature".to_string(),
                    })
                    .collect(),
            }),
            BlockType::Benefits => BlockContent::Benefits(BenefitsContent {
                items: (1..=3).map(|n| format!("Benefit {n}")).collect(),
            }),
            BlockType::Specifications => {
                BlockContent::Specifications(SpecificationsContent {
                    rows: vec![
                        SpecRow {
                            label: "Material".to_string(),
                            value: String::new(),
                        },
                        SpecRow {
                            label: "Dimensions".to_string(),
                            value: String::new(),
                        },
                    ],
                })
            }
            BlockType::Image => BlockContent::Image(ImageContent {
                src: None,
                alt: String::new(),
                caption: String::new(),
            }),
            BlockType::Gallery => BlockContent::Gallery(GalleryContent { images: Vec::new() }),
            BlockType::ImageText => BlockContent::ImageText(MediaTextContent::placeholder()),
            BlockType::TextImage => BlockContent::TextImage(MediaTextContent::placeholder()),
            BlockType::Video => BlockContent::Video(VideoContent {
                url: String::new(),
                autoplay: false,
                caption: String::new(),
            }),
            BlockType::Faq => BlockContent::Faq(FaqContent {
                items: vec![FaqItem {
                    question: "Your question?".to_string(),
                    answer: "Your answer.".to_string(),
                }],
            }),
            BlockType::Cta => BlockContent::Cta(CtaContent {
                heading: "Ready to get started?".to_string(),
                body: String::new(),
                button_text: "Buy now".to_string(),
                button_url: "#".to_string(),
            }),
        }
    }
}

impl MediaTextContent {
    fn placeholder() -> Self {
        Self {
            image_src: None,
            image_alt: String::new(),
            body: "Describe this image...".to_string(),
        }
    }
}

fn default_visible() -> bool {
    true
}

/// A typed content unit within a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Stable for the block's lifetime, unique within its document
    pub id: BlockId,

    pub title: String,

    #[serde(default = "default_visible")]
    pub visible: bool,

    #[serde(default)]
    pub columns: Columns,

    #[serde(default)]
    pub style: StyleMap,

    /// Variant payload; serialized inline next to the common fields
    #[serde(flatten)]
    pub content: BlockContent,
}

impl Block {
    /// Build a block of `kind` with default content
    pub fn new(id: impl Into<BlockId>, kind: BlockType) -> Self {
        Self {
            id: id.into(),
            title: kind.label().to_string(),
            visible: true,
            columns: Columns::Full,
            style: StyleMap::new(),
            content: BlockContent::default_for(kind),
        }
    }

    pub fn block_type(&self) -> BlockType {
        self.content.block_type()
    }

    /// Shallow-merge `patch` into this block.
    ///
    /// A content patch of another variant is rejected before any field is
    /// touched.
    pub fn apply_patch(&mut self, patch: &BlockPatch) -> Result<(), MutationError> {
        if let Some(content) = &patch.content {
            let found = content.block_type();
            if found != self.block_type() {
                return Err(MutationError::VariantMismatch {
                    expected: self.block_type(),
                    found,
                });
            }
        }

        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(visible) = patch.visible {
            self.visible = visible;
        }
        if let Some(columns) = patch.columns {
            self.columns = columns;
        }
        if let Some(style) = &patch.style {
            self.style = style.clone();
        }
        if let Some(content) = &patch.content {
            self.content = content.clone();
        }

        Ok(())
    }
}

/// Partial update of a block's fields. `None` leaves a field untouched;
/// `style` and `content` replace the whole value when present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlockPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Columns>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<BlockContent>,
}

impl BlockPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    pub fn columns(mut self, columns: Columns) -> Self {
        self.columns = Some(columns);
        self
    }

    pub fn style(mut self, style: StyleMap) -> Self {
        self.style = Some(style);
        self
    }

    pub fn content(mut self, content: BlockContent) -> Self {
        self.content = Some(content);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Source of fresh block ids
pub trait IdGenerator {
    fn next_id(&mut self, kind: BlockType) -> BlockId;

    /// Note an id that entered the session from outside (a loaded
    /// document) so it is never handed out again
    fn observe(&mut self, _id: &str) {}
}

/// `"<type>-<uuid v4>"`, the default for interactive editing
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&mut self, kind: BlockType) -> BlockId {
        format!("{}-{}", kind, uuid::Uuid::new_v4())
    }
}

/// `"<type>-<n>"` with one counter per type. Deterministic, for tests and
/// scripted replays.
#[derive(Debug, Clone, Default)]
pub struct SequentialIdGenerator {
    counters: HashMap<BlockType, u64>,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self, kind: BlockType) -> BlockId {
        let counter = self.counters.entry(kind).or_insert(0);
        *counter += 1;
        format!("{}-{}", kind, counter)
    }

    /// Moves the counter for `"<type>-<n>"` ids past `n`
    fn observe(&mut self, id: &str) {
        for kind in BlockType::ALL {
            let n = id
                .strip_prefix(kind.as_str())
                .and_then(|rest| rest.strip_prefix('-'))
                .and_then(|n| n.parse::<u64>().ok());

            if let Some(n) = n {
                let counter = self.counters.entry(kind).or_insert(0);
                *counter = (*counter).max(n);
                return;
            }
        }
    }
}

/// Construct a block from its wire tag, applying `overrides` on top of the
/// defaults. Fails without building anything for an unknown tag.
pub fn create_block(
    block_type: &str,
    overrides: Option<&BlockPatch>,
    ids: &mut dyn IdGenerator,
) -> Result<Block, MutationError> {
    let kind: BlockType = block_type.parse()?;
    let mut block = Block::new(ids.next_id(kind), kind);
    if let Some(patch) = overrides {
        block.apply_patch(patch)?;
    }
    Ok(block)
}
