//! Built-in templates stored on first run when there is nothing to migrate.

use crate::canonical::canonicalize;
use crate::error::Result;
use crate::lint::lint;
use crate::model::{Template, TemplateDraft};
use crate::signature::signature;

pub fn preset_drafts() -> Vec<TemplateDraft> {
    vec![
        TemplateDraft::new("Cinematic Portrait", "a weathered fisherman")
            .with_action("looking into the distance")
            .with_environment("foggy harbor at dawn")
            .with_style("cinematic photography")
            .with_lighting("soft window light")
            .with_camera("85mm lens, shallow depth of field")
            .with_category("portrait")
            .with_tags(["people", "moody"]),
        TemplateDraft::new("Product Hero Shot", "a glass perfume bottle")
            .with_action("standing on a pedestal")
            .with_environment("seamless white backdrop")
            .with_style("commercial product photography")
            .with_lighting("soft studio lighting")
            .with_camera("100mm macro")
            .with_category("product")
            .with_tags(["studio", "commercial"]),
        TemplateDraft::new("Neon City Night", "a lone cyclist")
            .with_action("riding through rain")
            .with_environment("cyberpunk city street")
            .with_style("digital art")
            .with_lighting("neon glow and wet reflections")
            .with_camera("wide angle, low vantage")
            .with_category("scifi")
            .with_tags(["cyberpunk", "night", "city"]),
        TemplateDraft::new("Storybook Forest", "a small red fox")
            .with_action("curled up asleep")
            .with_environment("mossy forest clearing")
            .with_style("watercolor illustration")
            .with_lighting("dappled morning sun")
            .with_category("illustration")
            .with_tags(["animals", "whimsical"]),
        TemplateDraft::new("Epic Landscape", "jagged mountain range")
            .with_environment("alpine valley with a glacial lake")
            .with_style("landscape photography")
            .with_lighting("golden hour")
            .with_camera("24mm, f/11")
            .with_category("landscape")
            .with_tags(["nature", "mountains"]),
    ]
}

/// Presets as stored, pinned templates.
pub fn seed_templates() -> Result<Vec<Template>> {
    preset_drafts()
        .iter()
        .map(|draft| {
            let canonical = canonicalize(draft);
            let sig = signature(&canonical)?;
            let quality = lint(&canonical).quality;
            let mut template = Template::from_canonical(&canonical, sig, quality);
            template.pinned = true;
            Ok(template)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Quality;
    use std::collections::HashSet;

    #[test]
    fn presets_are_green_and_pinned() {
        let seeds = seed_templates().unwrap();
        assert_eq!(seeds.len(), preset_drafts().len());
        assert!(seeds.iter().all(|t| t.pinned));
        assert!(seeds.iter().all(|t| t.quality == Quality::Green));
    }

    #[test]
    fn presets_have_distinct_signatures() {
        let seeds = seed_templates().unwrap();
        let sigs: HashSet<&str> = seeds.iter().map(|t| t.signature.as_str()).collect();
        assert_eq!(sigs.len(), seeds.len());
    }
}
