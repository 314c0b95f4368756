//! Prompt composition.
//!
//! Turns a scene description plus [`GenerationOptions`] into an ordered list of
//! parts. Reference images are attached in a fixed order (background, character,
//! style) and the instruction text refers to each one by its 1-based attachment
//! position, so the two must be built together.

use crate::models::{ComposedRequest, GenerationOptions, ImageData, Part};

pub const SCENE_ACTION_MARKER: &str = "SCENE ACTION:";

const ANTI_HALLUCINATION: &str = "Do not add any objects, people, animals, text or \
     subjects that are not explicitly requested.";

const COMPOSITE_INSTRUCTION: &str = "Composite the character naturally into the \
     background, matching its lighting, perspective, scale and cast shadows.";

const STYLE_PRESETS: &[(&str, &str)] = &[
    (
        "cinematic",
        "cinematic film still, dramatic composition, shallow depth of field, anamorphic lens, film grain",
    ),
    (
        "photographic",
        "professional photograph, DSLR, natural lighting, true-to-life color, crisp detail",
    ),
    (
        "photorealistic",
        "photorealistic, ultra detailed, natural skin texture, 85mm photography, sharp focus",
    ),
    (
        "anime",
        "anime illustration, clean line art, cel shading, vibrant colors, expressive eyes",
    ),
    (
        "3d render",
        "3D render, octane render, soft global illumination, subsurface scattering, high detail",
    ),
    (
        "oil painting",
        "oil painting on canvas, visible brush strokes, rich impasto texture, classical composition",
    ),
    (
        "watercolor",
        "watercolor painting, soft bleeding edges, paper texture, delicate washes of color",
    ),
    (
        "cyberpunk",
        "cyberpunk aesthetic, neon lights, rain-soaked streets, holographic signage, high contrast",
    ),
    (
        "comic book",
        "comic book art, bold ink outlines, halftone shading, dynamic panel composition",
    ),
    (
        "pixel art",
        "pixel art, 16-bit retro game style, limited palette, crisp pixels",
    ),
    (
        "fantasy",
        "epic fantasy art, ethereal atmosphere, intricate detail, painterly lighting",
    ),
];

/// Expands a style preset. Unknown presets are used as the style description as-is.
pub fn style_description(preset: &str) -> &str {
    let key = preset.trim();
    STYLE_PRESETS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(key))
        .map(|(_, expansion)| *expansion)
        .unwrap_or(key)
}

/// Composition hint for an aspect ratio string, empty when the ratio is unknown.
pub fn aspect_hint(ratio: &str) -> &'static str {
    match ratio {
        "1:1" => "square 1:1 composition, centered subject, balanced framing",
        "16:9" => "wide cinematic 16:9 landscape format, establishing shot",
        "9:16" => "tall vertical 9:16 social-media story format, full body shot",
        "4:3" => "classic 4:3 photographic framing, medium shot",
        "3:4" => "vertical 3:4 portrait framing, upper body shot",
        _ => "",
    }
}

#[derive(Clone, Copy)]
enum ReferenceRole {
    Background,
    Character,
    Style,
}

impl ReferenceRole {
    fn label(self) -> &'static str {
        match self {
            ReferenceRole::Background => "BACKGROUND/SETTING",
            ReferenceRole::Character => "CHARACTER IDENTITY",
            ReferenceRole::Style => "ART STYLE",
        }
    }

    fn instruction(self, index: usize) -> String {
        match self {
            ReferenceRole::Background => format!(
                "Use Reference Image {} as the exact background and environment of the scene.",
                index
            ),
            ReferenceRole::Character => format!(
                "Preserve the facial identity, features and build of the person in Reference Image {}.",
                index
            ),
            ReferenceRole::Style => format!(
                "Match the art style, color palette and rendering technique of Reference Image {}.",
                index
            ),
        }
    }
}

/// Builds the attachments and instruction text for one scene.
pub fn compose(scene_text: &str, options: &GenerationOptions) -> ComposedRequest {
    let mut preamble: Vec<String> = Vec::new();

    if let Some(character) = &options.character {
        preamble.push(format!(
            "Main character \"{}\": {}",
            character.name,
            character.description.trim()
        ));
    }

    let mut style_clause: Vec<String> = Vec::new();
    let style = style_description(&options.style_preset);
    if !style.is_empty() {
        style_clause.push(format!("Style: {}.", style));
    }
    if let Some(lighting) = &options.advanced.lighting {
        style_clause.push(format!("Lighting: {}.", lighting));
    }
    if let Some(camera) = &options.advanced.camera {
        style_clause.push(format!("Camera: {}.", camera));
    }
    if let Some(grade) = &options.advanced.color_grade {
        style_clause.push(format!("Color grade: {}.", grade));
    }
    if !style_clause.is_empty() {
        preamble.push(style_clause.join(" "));
    }

    let hint = aspect_hint(options.aspect_ratio.as_str());
    if !hint.is_empty() {
        preamble.push(format!("Format: {}.", hint));
    }

    let references: [(ReferenceRole, Option<&ImageData>); 3] = [
        (ReferenceRole::Background, options.background_reference.as_ref()),
        (
            ReferenceRole::Character,
            options.character.as_ref().map(|c| &c.thumbnail),
        ),
        (ReferenceRole::Style, options.style_reference.as_ref()),
    ];

    let mut parts = Vec::new();
    let mut labels = Vec::new();
    let mut instructions = Vec::new();
    for (role, image) in references {
        let Some(image) = image.filter(|img| !img.is_empty()) else {
            continue;
        };
        parts.push(Part::image(image));
        let index = parts.len();
        labels.push(format!("[Reference Image {}: {}]", index, role.label()));
        instructions.push(role.instruction(index));
    }

    let has_character_ref = options
        .character
        .as_ref()
        .is_some_and(|c| !c.thumbnail.is_empty());
    let has_background_ref = options
        .background_reference
        .as_ref()
        .is_some_and(|b| !b.is_empty());
    if has_character_ref && has_background_ref {
        instructions.push(COMPOSITE_INSTRUCTION.to_string());
    }

    instructions.push(ANTI_HALLUCINATION.to_string());

    if let Some(negative) = options
        .negative_constraints
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
    {
        instructions.push(format!("Avoid: {}.", negative));
    }

    let mut references_text = String::new();
    if !labels.is_empty() {
        references_text.push_str(&labels.join(" "));
        references_text.push('\n');
    }
    references_text.push_str(&instructions.join(" "));

    let mut sections = preamble;
    sections.push(references_text);
    sections.push(format!("{} {}", SCENE_ACTION_MARKER, scene_text));

    parts.push(Part::text(sections.join("\n\n")));

    ComposedRequest {
        parts,
        aspect_ratio: options.aspect_ratio,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AdvancedOptions, AspectRatio, CharacterIdentity};

    fn image(tag: &str) -> ImageData {
        ImageData::new("image/png", tag)
    }

    fn character() -> CharacterIdentity {
        CharacterIdentity::new("Mira", "Short silver hair, green eyes.", image("CHAR"))
    }

    fn instruction(request: &ComposedRequest) -> &str {
        request.parts.last().and_then(Part::as_text).unwrap()
    }

    #[test]
    fn test_plain_prompt_ends_with_scene_text() {
        let request = compose("A lighthouse at dusk", &GenerationOptions::default());
        assert_eq!(request.parts.len(), 1);
        assert_eq!(request.aspect_ratio, AspectRatio::Square);
        let text = instruction(&request);
        assert!(text.ends_with("SCENE ACTION: A lighthouse at dusk"));
        assert!(text.contains(ANTI_HALLUCINATION));
        assert!(!text.contains("Style:"));
        assert!(!text.contains("Avoid:"));
    }

    #[test]
    fn test_known_preset_is_expanded() {
        let options = GenerationOptions::new().with_style("Anime");
        let text = instruction(&compose("x", &options)).to_string();
        assert!(text.contains("Style: anime illustration, clean line art"));
    }

    #[test]
    fn test_ui_presets_all_expand() {
        for preset in ["Cinematic", "Anime", "Photographic", "3D Render", "Watercolor", "Cyberpunk"] {
            assert_ne!(style_description(preset), preset, "preset: {}", preset);
        }
        assert!(style_description("photographic").starts_with("professional photograph"));
    }

    #[test]
    fn test_unknown_preset_used_verbatim() {
        let options = GenerationOptions::new().with_style("Ukiyo-e woodblock");
        let text = instruction(&compose("x", &options)).to_string();
        assert!(text.contains("Style: Ukiyo-e woodblock."));
    }

    #[test]
    fn test_aspect_hint_table() {
        assert_eq!(
            aspect_hint("9:16"),
            "tall vertical 9:16 social-media story format, full body shot"
        );
        assert_eq!(aspect_hint("21:9"), "");
        for ratio in AspectRatio::ALL {
            assert!(!aspect_hint(ratio.as_str()).is_empty());
        }
    }

    #[test]
    fn test_preamble_order() {
        let options = GenerationOptions::new()
            .with_character(character())
            .with_style("cinematic")
            .with_aspect_ratio(AspectRatio::Landscape)
            .with_advanced(
                AdvancedOptions::default()
                    .with_lighting("golden hour")
                    .with_camera("35mm wide")
                    .with_color_grade("teal and orange"),
            );
        let request = compose("walks home", &options);
        let text = instruction(&request);

        let pos = |needle: &str| text.find(needle).unwrap();
        assert!(pos("Main character \"Mira\"") < pos("Style:"));
        assert!(pos("Style:") < pos("Lighting: golden hour."));
        assert!(pos("Lighting:") < pos("Camera: 35mm wide."));
        assert!(pos("Camera:") < pos("Color grade: teal and orange."));
        assert!(pos("Color grade:") < pos("Format: wide cinematic 16:9"));
        assert!(pos("Format:") < pos(SCENE_ACTION_MARKER));
    }

    #[test]
    fn test_reference_order_matches_labels() {
        let options = GenerationOptions::new()
            .with_style_reference(image("STYLE"))
            .with_character(character())
            .with_background_reference(image("BG"));
        let request = compose("stands in the rain", &options);

        let attached: Vec<&str> = request
            .parts
            .iter()
            .filter_map(Part::as_inline_data)
            .map(|d| d.data.as_str())
            .collect();
        assert_eq!(attached, vec!["BG", "CHAR", "STYLE"]);
        assert_eq!(request.attachment_count(), 3);

        let text = instruction(&request);
        assert!(text.contains("[Reference Image 1: BACKGROUND/SETTING]"));
        assert!(text.contains("[Reference Image 2: CHARACTER IDENTITY]"));
        assert!(text.contains("[Reference Image 3: ART STYLE]"));
        assert!(text.contains("Use Reference Image 1 as the exact background"));
        assert!(text.contains("person in Reference Image 2"));
        assert!(text.contains("rendering technique of Reference Image 3"));
        assert!(text.contains(COMPOSITE_INSTRUCTION));

        let bg = text.find("Reference Image 1:").unwrap();
        let ch = text.find("Reference Image 2:").unwrap();
        let st = text.find("Reference Image 3:").unwrap();
        assert!(bg < ch && ch < st);
    }

    #[test]
    fn test_indices_follow_attachment_position() {
        let options = GenerationOptions::new().with_style_reference(image("STYLE"));
        let request = compose("x", &options);
        let text = instruction(&request);
        assert_eq!(request.attachment_count(), 1);
        assert!(text.contains("[Reference Image 1: ART STYLE]"));
        assert!(!text.contains("Reference Image 2"));
        assert!(!text.contains(COMPOSITE_INSTRUCTION));
    }

    #[test]
    fn test_composite_requires_both_references() {
        let options = GenerationOptions::new().with_character(character());
        let text = instruction(&compose("x", &options)).to_string();
        assert!(text.contains("[Reference Image 1: CHARACTER IDENTITY]"));
        assert!(!text.contains(COMPOSITE_INSTRUCTION));
    }

    #[test]
    fn test_negative_constraints() {
        let options = GenerationOptions::new().with_negative_constraints("blur, watermark");
        let text = instruction(&compose("x", &options)).to_string();
        assert!(text.contains("Avoid: blur, watermark."));
        assert!(text.find(ANTI_HALLUCINATION).unwrap() < text.find("Avoid:").unwrap());

        let blank = GenerationOptions::new().with_negative_constraints("   ");
        assert!(!instruction(&compose("x", &blank)).contains("Avoid:"));
    }
}
