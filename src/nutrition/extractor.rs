//! Extraction driver
//!
//! Normalizes the global transcript and each region transcript, runs every
//! field strategy against its region first and the global text second, then
//! derives sugar per pack when it was not read directly.

use tracing::debug;

use crate::config::ExtractionConfig;
use crate::models::{FieldSource, NutritionRecord, Provenance, RegionField, RegionTexts};

use super::normalizer::normalize;
use super::serving_size::parse_serving_size;
use super::servings_per_pack::parse_servings_per_pack;
use super::sugar::{parse_sugar_per_pack, parse_sugar_per_serving, plausible_sugar_guess};

/// A normalized transcript
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    text: String,
}

impl Transcript {
    pub fn normalized(raw: &str) -> Self {
        Self {
            text: normalize(raw),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn lines(&self) -> Vec<&str> {
        self.text.lines().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Record plus where each field came from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub record: NutritionRecord,
    pub provenance: Provenance,
}

/// Field extractor
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    config: ExtractionConfig,
}

impl Extractor {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Extract all fields from a global transcript and optional region transcripts
    pub fn extract(&self, global_text: &str, regions: &RegionTexts) -> Extraction {
        let global = Transcript::normalized(global_text);
        let region = |field: RegionField| {
            regions
                .get(field)
                .map(Transcript::normalized)
                .filter(|t| !t.is_empty())
        };
        let serving_region = region(RegionField::ServingSize);
        let servings_region = region(RegionField::ServingsPerPack);
        let sugar_region = region(RegionField::Sugar);

        let mut record = NutritionRecord::empty(global_text);
        let mut provenance = Provenance::default();

        (record.serving_size_grams, provenance.serving_size) =
            from_sources(serving_region.as_ref(), &global, |lines: &[&str]| {
                parse_serving_size(lines)
            });

        (record.servings_per_pack, provenance.servings_per_pack) =
            from_sources(servings_region.as_ref(), &global, |lines: &[&str]| {
                parse_servings_per_pack(lines)
            });

        (record.sugar_per_serving_grams, provenance.sugar_per_serving) =
            from_sources(sugar_region.as_ref(), &global, |lines: &[&str]| {
                parse_sugar_per_serving(lines)
            });

        (record.sugar_per_pack_grams, provenance.sugar_per_pack) =
            from_sources(sugar_region.as_ref(), &global, |lines: &[&str]| {
                parse_sugar_per_pack(lines)
            });

        if self.config.region_sugar_guess && provenance.sugar_per_serving != FieldSource::Region {
            let guess = sugar_region
                .as_ref()
                .and_then(|t| plausible_sugar_guess(t.text()));
            if let Some(guess) = guess {
                debug!(guess, "sugar per serving guessed from sugar region");
                record.sugar_per_serving_grams = Some(guess);
                provenance.sugar_per_serving = FieldSource::Guessed;
            }
        }

        if record.sugar_per_pack_grams.is_none() {
            if let Some(derived) = record.derived_sugar_per_pack() {
                record.sugar_per_pack_grams = Some(derived);
                provenance.sugar_per_pack = FieldSource::Derived;
            }
        }

        debug!(?provenance, "extraction finished");
        Extraction { record, provenance }
    }
}

/// Nutrition record from a global transcript and optional region transcripts
pub fn parse_nutrition(global_text: &str, regions: &RegionTexts) -> NutritionRecord {
    Extractor::default().extract(global_text, regions).record
}

/// Try the field's region transcript, then the global one
fn from_sources<T, F>(
    region: Option<&Transcript>,
    global: &Transcript,
    strategy: F,
) -> (Option<T>, FieldSource)
where
    F: Fn(&[&str]) -> Option<T>,
{
    let sources = [(FieldSource::Region, region), (FieldSource::Global, Some(global))];
    sources
        .into_iter()
        .filter_map(|(source, transcript)| {
            transcript.filter(|t| !t.is_empty()).map(|t| (source, t))
        })
        .find_map(|(source, transcript)| {
            strategy(&transcript.lines()).map(|v| (Some(v), source))
        })
        .unwrap_or((None, FieldSource::Absent))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABEL: &str = "Serving size 30 g\nServings per pack 3\nSugar total 12 g per serving";

    #[test]
    fn test_end_to_end_global_only() {
        let record = parse_nutrition(LABEL, &RegionTexts::new());
        assert_eq!(record.serving_size_grams, Some(30.0));
        assert_eq!(record.servings_per_pack, Some(3));
        assert_eq!(record.sugar_per_serving_grams, Some(12.0));
        assert_eq!(record.sugar_per_pack_grams, Some(36.0));
        assert_eq!(record.raw_text, LABEL);
        assert!(record.product_name.is_none());
    }

    #[test]
    fn test_indonesian_label() {
        let text = "INFORMASI NILAI GIZI\nTakaran saji 209\n4 Sajian/Kemasan\nGula total 9 9\nNatrium 95 mg";
        let record = parse_nutrition(text, &RegionTexts::new());
        assert_eq!(record.serving_size_grams, Some(20.0));
        assert_eq!(record.servings_per_pack, Some(4));
        assert_eq!(record.sugar_per_serving_grams, Some(9.0));
        assert_eq!(record.sugar_per_pack_grams, Some(36.0));
    }

    #[test]
    fn test_servings_count_on_next_line_not_taken_as_unit() {
        let text = "Takaran saji 20 g\nGula total 12\n9 sajian per kemasan";
        let record = parse_nutrition(text, &RegionTexts::new());
        assert_eq!(record.serving_size_grams, Some(20.0));
        assert_eq!(record.servings_per_pack, Some(9));
        assert_eq!(record.sugar_per_serving_grams, Some(12.0));
        assert_eq!(record.sugar_per_pack_grams, Some(108.0));
    }

    #[test]
    fn test_region_wins_over_global() {
        let regions = RegionTexts::new().with(RegionField::ServingSize, "Takaran saji 25 g");
        let extraction = Extractor::default().extract(LABEL, &regions);
        assert_eq!(extraction.record.serving_size_grams, Some(25.0));
        assert_eq!(extraction.provenance.serving_size, FieldSource::Region);
        assert_eq!(extraction.provenance.servings_per_pack, FieldSource::Global);
    }

    #[test]
    fn test_empty_region_falls_back_to_global() {
        let regions = RegionTexts::new().with(RegionField::ServingSize, "");
        let extraction = Extractor::default().extract(LABEL, &regions);
        assert_eq!(extraction.record.serving_size_grams, Some(30.0));
        assert_eq!(extraction.provenance.serving_size, FieldSource::Global);
    }

    #[test]
    fn test_unmatched_region_falls_back_to_global() {
        let regions = RegionTexts::new().with(RegionField::Sugar, "lemak jenuh 2 g");
        let extraction = Extractor::default().extract(LABEL, &regions);
        assert_eq!(extraction.record.sugar_per_serving_grams, Some(12.0));
        assert_eq!(extraction.provenance.sugar_per_serving, FieldSource::Global);
    }

    #[test]
    fn test_field_absent_when_nothing_matches() {
        let regions = RegionTexts::new().with(RegionField::ServingSize, "");
        let extraction = Extractor::default().extract("energi total 150 kkal", &regions);
        assert_eq!(extraction.record.serving_size_grams, None);
        assert_eq!(extraction.provenance.serving_size, FieldSource::Absent);
        assert!(extraction.record.is_empty());
    }

    #[test]
    fn test_empty_input_yields_empty_record() {
        let record = parse_nutrition("", &RegionTexts::new());
        assert_eq!(record, NutritionRecord::empty(""));
    }

    #[test]
    fn test_derivation() {
        let extraction = Extractor::default().extract(
            "gula total 12 g",
            &RegionTexts::new().with(RegionField::ServingsPerPack, "3 sajian per kemasan"),
        );
        assert_eq!(extraction.record.sugar_per_pack_grams, Some(36.0));
        assert_eq!(extraction.provenance.sugar_per_pack, FieldSource::Derived);
    }

    #[test]
    fn test_no_derivation_without_servings() {
        let record = parse_nutrition("gula total 12 g", &RegionTexts::new());
        assert_eq!(record.sugar_per_serving_grams, Some(12.0));
        assert_eq!(record.sugar_per_pack_grams, None);
    }

    #[test]
    fn test_explicit_sugar_per_pack_not_overwritten() {
        let text = "gula total 9 g\n3 sajian per kemasan\ngula total per kemasan 30 g";
        let extraction = Extractor::default().extract(text, &RegionTexts::new());
        assert_eq!(extraction.record.sugar_per_pack_grams, Some(30.0));
        assert_eq!(extraction.provenance.sugar_per_pack, FieldSource::Global);
    }

    #[test]
    fn test_sugar_guess_disabled_by_default() {
        let regions = RegionTexts::new().with(RegionField::Sugar, "9 4 3");
        let record = parse_nutrition("", &regions);
        assert_eq!(record.sugar_per_serving_grams, None);
    }

    #[test]
    fn test_sugar_guess_when_enabled() {
        let extractor = Extractor::new(ExtractionConfig { region_sugar_guess: true });
        let regions = RegionTexts::new().with(RegionField::Sugar, "9 4 3");
        let extraction = extractor.extract("gula total 20 g", &regions);
        assert_eq!(extraction.record.sugar_per_serving_grams, Some(9.0));
        assert_eq!(extraction.provenance.sugar_per_serving, FieldSource::Guessed);
    }

    #[test]
    fn test_transcript_lines() {
        let transcript = Transcript::normalized("A\r\nB 7 9");
        assert_eq!(transcript.lines(), vec!["a", "b 7 g"]);
    }
}
