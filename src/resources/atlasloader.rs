//! XML atlas description loader.
//!
//! Builds a [`TextureAtlas`] from a document of this shape:
//!
//! ```xml
//! <Atlas>
//!     <Texture>images/atlas</Texture>
//!     <Regions>
//!         <Region name="spriteOne" x="0" y="0" width="32" height="32" />
//!         <Region name="spriteTwo" x="32" y="0" width="32" height="32" />
//!     </Regions>
//!     <Animations>
//!         <Animation name="animation" delay="100">
//!             <Frame region="spriteOne" />
//!             <Frame region="spriteTwo" />
//!         </Animation>
//!     </Animations>
//! </Atlas>
//! ```
//!
//! The document is read in a single forward pass: a `<Frame>` can only refer
//! to a region declared earlier in `<Regions>`. Any failure aborts the whole
//! load and no atlas is returned.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use roxmltree::{Document, Node};

use crate::error::{AtlasError, Result};
use crate::resources::textureatlas::{Animation, TextureAtlas};

/// Resolves a texture path from an atlas description into a texture id.
///
/// Implemented by [`RaylibTextureLoader`](crate::resources::texturestore::RaylibTextureLoader)
/// for real textures; tests plug in their own.
pub trait TextureLoader {
    fn load_texture(&mut self, path: &str) -> Result<Arc<str>>;
}

impl TextureAtlas {
    /// Read `content_root/file_name` and build an atlas from it.
    pub fn from_file(
        content_root: impl AsRef<Path>,
        file_name: impl AsRef<Path>,
        loader: &mut impl TextureLoader,
    ) -> Result<TextureAtlas> {
        let path = content_root.as_ref().join(file_name);
        let text = std::fs::read_to_string(&path)?;
        info!("Loading texture atlas from {:?}", path);
        Self::from_description(&text, loader)
    }

    /// Build an atlas from the text of an XML description.
    pub fn from_description(text: &str, loader: &mut impl TextureLoader) -> Result<TextureAtlas> {
        let doc = Document::parse(text)?;
        let root = doc.root_element();

        let texture_path = child(root, "Texture")
            .and_then(|n| n.text())
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or(AtlasError::MissingElement("Texture"))?;
        let texture = loader.load_texture(texture_path)?;
        let mut atlas = TextureAtlas::new(texture);

        if let Some(regions) = child(root, "Regions") {
            for region in children(regions, "Region") {
                let x = int_attribute(region, "x")?;
                let y = int_attribute(region, "y")?;
                let width = int_attribute(region, "width")?;
                let height = int_attribute(region, "height")?;
                match region.attribute("name").filter(|n| !n.is_empty()) {
                    Some(name) => atlas.add_region(name, x, y, width, height)?,
                    None => debug!(
                        "Skipping unnamed region at ({}, {}) {}x{}",
                        x, y, width, height
                    ),
                }
            }
        }

        let animations = child(root, "Animations").ok_or(AtlasError::MissingElement("Animations"))?;
        for element in children(animations, "Animation") {
            let name = element
                .attribute("name")
                .ok_or(AtlasError::MissingAttribute {
                    element: "Animation",
                    attribute: "name",
                })?;
            let delay = delay_attribute(element)?;

            let mut frames = Vec::new();
            for frame in children(element, "Frame") {
                let region_name = frame.attribute("region").ok_or(AtlasError::MissingAttribute {
                    element: "Frame",
                    attribute: "region",
                })?;
                frames.push(atlas.get_region(region_name)?.clone());
            }

            atlas.add_animation(name, Animation::new(frames, delay))?;
        }

        info!(
            "Loaded texture atlas '{}': {} regions, {} animations",
            atlas.texture(),
            atlas.region_count(),
            atlas.animation_count()
        );
        Ok(atlas)
    }
}

fn child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(tag))
}

fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children().filter(move |n| n.has_tag_name(tag))
}

/// Integer attribute, `0` when absent.
fn int_attribute(node: Node, attribute: &'static str) -> Result<i32> {
    match node.attribute(attribute) {
        None => Ok(0),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| AtlasError::InvalidInteger {
                attribute,
                value: value.to_string(),
            }),
    }
}

/// Frame delay in milliseconds, `0` when absent.
fn delay_attribute(node: Node) -> Result<Duration> {
    let Some(value) = node.attribute("delay") else {
        return Ok(Duration::ZERO);
    };
    match value.trim().parse::<f64>() {
        Ok(millis) if millis.is_finite() && millis >= 0.0 => {
            Ok(Duration::from_nanos((millis * 1_000_000.0).round() as u64))
        }
        _ => Err(AtlasError::InvalidDelay(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hands out the description path as the texture id.
    #[derive(Default)]
    struct PathLoader {
        requested: Vec<String>,
    }

    impl TextureLoader for PathLoader {
        fn load_texture(&mut self, path: &str) -> Result<Arc<str>> {
            self.requested.push(path.to_string());
            Ok(Arc::from(path))
        }
    }

    struct FailingLoader;

    impl TextureLoader for FailingLoader {
        fn load_texture(&mut self, path: &str) -> Result<Arc<str>> {
            Err(AtlasError::Texture {
                path: path.to_string(),
                reason: "no such file".to_string(),
            })
        }
    }

    const WALK: &str = r#"
        <Atlas>
            <Texture>images/atlas</Texture>
            <Regions>
                <Region name="A" x="0" y="0" width="32" height="32" />
                <Region name="B" x="32" y="0" width="32" height="32" />
            </Regions>
            <Animations>
                <Animation name="walk" delay="100">
                    <Frame region="A" />
                    <Frame region="B" />
                </Animation>
            </Animations>
        </Atlas>
    "#;

    fn load(text: &str) -> Result<TextureAtlas> {
        TextureAtlas::from_description(text, &mut PathLoader::default())
    }

    #[test]
    fn test_loads_regions_and_animation() {
        let mut loader = PathLoader::default();
        let atlas = TextureAtlas::from_description(WALK, &mut loader).unwrap();
        assert_eq!(loader.requested, vec!["images/atlas".to_string()]);
        assert_eq!(&**atlas.texture(), "images/atlas");

        let a = atlas.get_region("A").unwrap();
        let b = atlas.get_region("B").unwrap();
        assert_eq!((b.x, b.y, b.width, b.height), (32, 0, 32, 32));

        let walk = atlas.get_animation("walk").unwrap();
        assert_eq!(walk.frames.len(), 2);
        assert!(Arc::ptr_eq(&walk.frames[0], a));
        assert!(Arc::ptr_eq(&walk.frames[1], b));
        assert_eq!(walk.delay, Duration::from_millis(100));
    }

    #[test]
    fn test_missing_region_attributes_default_to_zero() {
        let atlas = load(
            r#"<Atlas><Texture>t</Texture>
                <Regions><Region name="r" width="5" /></Regions>
                <Animations /></Atlas>"#,
        )
        .unwrap();
        let r = atlas.get_region("r").unwrap();
        assert_eq!((r.x, r.y, r.width, r.height), (0, 0, 5, 0));
    }

    #[test]
    fn test_unnamed_regions_are_skipped() {
        let atlas = load(
            r#"<Atlas><Texture>t</Texture>
                <Regions>
                    <Region x="1" y="1" width="2" height="2" />
                    <Region name="" x="1" y="1" width="2" height="2" />
                    <Region name="kept" />
                </Regions>
                <Animations /></Atlas>"#,
        )
        .unwrap();
        assert_eq!(atlas.region_count(), 1);
        assert!(atlas.get_region("kept").is_ok());
    }

    #[test]
    fn test_missing_delay_defaults_to_zero() {
        let atlas = load(
            r#"<Atlas><Texture>t</Texture>
                <Regions><Region name="a" /></Regions>
                <Animations><Animation name="still"><Frame region="a" /></Animation></Animations>
            </Atlas>"#,
        )
        .unwrap();
        assert_eq!(atlas.get_animation("still").unwrap().delay, Duration::ZERO);
    }

    #[test]
    fn test_fractional_delay() {
        let atlas = load(
            r#"<Atlas><Texture>t</Texture>
                <Animations><Animation name="fast" delay="12.5" /></Animations>
            </Atlas>"#,
        )
        .unwrap();
        assert_eq!(
            atlas.get_animation("fast").unwrap().delay,
            Duration::from_micros(12_500)
        );
    }

    #[test]
    fn test_undeclared_frame_region_aborts_load() {
        let err = load(
            r#"<Atlas><Texture>t</Texture>
                <Regions><Region name="a" /></Regions>
                <Animations><Animation name="walk"><Frame region="b" /></Animation></Animations>
            </Atlas>"#,
        )
        .unwrap_err();
        assert!(matches!(err, AtlasError::RegionNotFound(ref n) if n == "b"));
    }

    #[test]
    fn test_regions_are_read_before_animations() {
        // Container order inside <Atlas> does not matter.
        let atlas = load(
            r#"<Atlas>
                <Animations><Animation name="walk"><Frame region="a" /></Animation></Animations>
                <Regions><Region name="a" /></Regions>
                <Texture>t</Texture>
            </Atlas>"#,
        )
        .unwrap();
        assert_eq!(atlas.get_animation("walk").unwrap().frame_count(), 1);
    }

    #[test]
    fn test_malformed_integer_fails() {
        let err = load(
            r#"<Atlas><Texture>t</Texture>
                <Regions><Region name="a" x="ten" /></Regions>
                <Animations /></Atlas>"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AtlasError::InvalidInteger { attribute: "x", .. }
        ));
    }

    #[test]
    fn test_malformed_or_negative_delay_fails() {
        for delay in ["soon", "-5"] {
            let text = format!(
                r#"<Atlas><Texture>t</Texture>
                    <Animations><Animation name="a" delay="{delay}" /></Animations>
                </Atlas>"#
            );
            assert!(matches!(load(&text), Err(AtlasError::InvalidDelay(_))));
        }
    }

    #[test]
    fn test_missing_texture_fails() {
        let err = load("<Atlas><Animations /></Atlas>").unwrap_err();
        assert!(matches!(err, AtlasError::MissingElement("Texture")));
    }

    #[test]
    fn test_missing_animations_container_fails() {
        let err = load("<Atlas><Texture>t</Texture><Regions /></Atlas>").unwrap_err();
        assert!(matches!(err, AtlasError::MissingElement("Animations")));
    }

    #[test]
    fn test_missing_animation_name_and_frame_region() {
        let err = load(
            r#"<Atlas><Texture>t</Texture><Animations><Animation delay="1" /></Animations></Atlas>"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AtlasError::MissingAttribute {
                element: "Animation",
                attribute: "name"
            }
        ));

        let err = load(
            r#"<Atlas><Texture>t</Texture><Animations><Animation name="a"><Frame /></Animation></Animations></Atlas>"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AtlasError::MissingAttribute {
                element: "Frame",
                attribute: "region"
            }
        ));
    }

    #[test]
    fn test_duplicate_region_in_description_fails() {
        let err = load(
            r#"<Atlas><Texture>t</Texture>
                <Regions><Region name="a" /><Region name="a" x="3" /></Regions>
                <Animations /></Atlas>"#,
        )
        .unwrap_err();
        assert!(matches!(err, AtlasError::DuplicateRegion(_)));
    }

    #[test]
    fn test_texture_loader_error_propagates() {
        let err = TextureAtlas::from_description(WALK, &mut FailingLoader).unwrap_err();
        assert!(matches!(err, AtlasError::Texture { .. }));
    }

    #[test]
    fn test_malformed_xml_fails() {
        assert!(matches!(load("<Atlas><Texture>"), Err(AtlasError::Xml(_))));
    }

    #[test]
    fn test_from_file_missing_file_is_io_error() {
        let err = TextureAtlas::from_file(
            "/definitely/not/here",
            "atlas.xml",
            &mut PathLoader::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AtlasError::Io(_)));
    }
}
