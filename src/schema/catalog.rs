//! The concrete extraction schemas used by the two report kinds.
//!
//! Each constructor returns an independent, versioned schema. The
//! innovation-profile and readiness schemas drive the readiness report;
//! the impact-profile and impact-area-tags schemas drive the
//! geographic/impact-area report.

use super::{ExtractionSchema, FieldSpec};

const IMPACT_TAG_CHOICES: [&str; 4] = ["Principal", "Significant", "Not Targeted", "Not provided"];

const REGION_CHOICES: [&str; 7] = [
    "Africa",
    "Asia",
    "Europe",
    "Latin America and the Caribbean",
    "North America",
    "Oceania",
    "Not provided",
];

const READINESS_LEVEL_CHOICES: [&str; 9] = [
    "Level 1 - Basic Research",
    "Level 2 - Formulation",
    "Level 3 - Proof of Concept",
    "Level 4 - Controlled Testing Demonstration",
    "Level 5 - Model/Early Prototype",
    "Level 6 - Semi-controlled Testing",
    "Level 7 - Prototype",
    "Level 8 - Uncontrolled Testing",
    "Level 9 - Proven Innovation",
];

/// Fields extracted from the primary result document for the readiness
/// report: titles, characterization and the researcher-reported readiness
/// level with its justification.
pub fn innovation_profile() -> ExtractionSchema {
    ExtractionSchema::new(
        "innovation_profile",
        "1",
        vec![
            FieldSpec::text(
                "description",
                "Description",
                "A brief description of the innovation.",
            ),
            FieldSpec::text(
                "long_title",
                "Long Title",
                "The long title of the innovation. Otherwise return 'Not Provided.'",
            ),
            FieldSpec::text(
                "short_title",
                "Short Title",
                "The short title of the innovation. Otherwise return 'Not Provided.'",
            ),
            FieldSpec::text(
                "innovation_character",
                "Innovation Characterization",
                "The characterization that best categorizes the degree of innovation.",
            )
            .with_choices(&[
                "Incremental innovation",
                "Radical innovation",
                "Disruptive innovation",
            ]),
            FieldSpec::text(
                "innovation_typology",
                "Innovation Typology",
                "The typology that best characterizes the innovation.",
            )
            .with_choices(&[
                "Technological innovation",
                "Capacity development innovation",
                "Policy, organizational or institutional innovation",
            ]),
            FieldSpec::text(
                "readiness_level",
                "Readiness Level",
                "The readiness level of the innovation.",
            )
            .with_choices(&READINESS_LEVEL_CHOICES),
            FieldSpec::text(
                "readiness_justif",
                "Readiness Justification",
                "A brief explanation of how the provided evidence justifies the readiness \
                 level of the innovation.",
            ),
        ],
    )
}

/// Fields produced by the readiness tag stage from the evidence summary.
pub fn readiness() -> ExtractionSchema {
    ExtractionSchema::new(
        "readiness",
        "1",
        vec![
            FieldSpec::text(
                "readiness_level",
                "Readiness Level",
                "The readiness level selected.",
            ),
            FieldSpec::text(
                "readiness_level_summary",
                "Readiness Level Summary",
                "The summary which justifies the readiness level selected.",
            ),
        ],
    )
}

/// Fields extracted from the primary result document for the
/// geographic/impact-area report, including the researcher-reported
/// geographic location and impact-area tags.
pub fn impact_profile() -> ExtractionSchema {
    ExtractionSchema::new(
        "impact_profile",
        "1",
        vec![
            FieldSpec::text("project_title", "Project Title", "The title of the project."),
            FieldSpec::text(
                "description.description",
                "Description",
                "A brief description of the innovation.",
            ),
            FieldSpec::text(
                "geographic_location.geographic_focus",
                "Geographic Focus",
                "The geographic focus of the innovation.",
            )
            .with_choices(&["Global", "Regional", "National", "Sub-national", "Not provided"]),
            FieldSpec::text_list(
                "geographic_location.region",
                "Region",
                "The region(s) where the innovation is being implemented.",
            )
            .with_choices(&REGION_CHOICES),
            FieldSpec::text_list(
                "geographic_location.country",
                "Country",
                "The country(ies) that the innovation targets. Choices are any of the \
                 countries in the world or 'Not provided'. Select only the choices that \
                 are relevant given the description.",
            ),
            FieldSpec::text(
                "impact_areas.gender_tag",
                "Gender tag",
                "The gender tag of the research results.",
            )
            .with_choices(&IMPACT_TAG_CHOICES),
            FieldSpec::text(
                "impact_areas.climate_change_tag",
                "Climate Change tag",
                "The climate change tag of the research results.",
            )
            .with_choices(&IMPACT_TAG_CHOICES),
            FieldSpec::text(
                "impact_areas.nutrition_tag",
                "Nutrition tag",
                "The nutrition tag of the research results.",
            )
            .with_choices(&IMPACT_TAG_CHOICES),
            FieldSpec::text(
                "impact_areas.environment_tag",
                "Environment and/or biodiversity tag",
                "The environment tag of the research results.",
            )
            .with_choices(&IMPACT_TAG_CHOICES),
            FieldSpec::text(
                "impact_areas.poverty_tag",
                "Poverty tag",
                "The poverty tag of the research results.",
            )
            .with_choices(&IMPACT_TAG_CHOICES),
        ],
    )
}

/// Fields produced by the geographic/impact-area tag stage from the
/// evidence summary: final labels plus one-sentence justifications.
pub fn impact_area_tags() -> ExtractionSchema {
    ExtractionSchema::new(
        "impact_area_tags",
        "1",
        vec![
            FieldSpec::text(
                "geographic_location.geographic_focus",
                "Geographic Focus",
                "The geographic focus of the project.",
            ),
            FieldSpec::text(
                "geographic_location.region",
                "Region",
                "The region where the project is being implemented.",
            ),
            FieldSpec::text(
                "geographic_location.country",
                "Country",
                "The country where the project took place.",
            ),
            FieldSpec::text(
                "impact_areas.gender_tag",
                "Gender tag",
                "The gender tag of the research results.",
            ),
            FieldSpec::text(
                "impact_areas.climate_change_tag",
                "Climate Change tag",
                "The climate change tag of the research results.",
            ),
            FieldSpec::text(
                "impact_areas.nutrition_tag",
                "Nutrition tag",
                "The nutrition tag of the research results.",
            ),
            FieldSpec::text(
                "impact_areas.environment_tag",
                "Environment and/or biodiversity tag",
                "The environment tag of the research results.",
            ),
            FieldSpec::text(
                "impact_areas.poverty_tag",
                "Poverty tag",
                "The poverty tag of the research results.",
            ),
            FieldSpec::text(
                "impact_justifications.gender_tag_just",
                "Gender tag justification",
                "A single sentence justification for why the gender tag label was selected.",
            ),
            FieldSpec::text(
                "impact_justifications.climate_change_tag_just",
                "Climate Change tag justification",
                "A single sentence justification for why the climate change tag label was \
                 selected.",
            ),
            FieldSpec::text(
                "impact_justifications.nutrition_tag_just",
                "Nutrition tag justification",
                "A single sentence justification for why the nutrition tag label was selected.",
            ),
            FieldSpec::text(
                "impact_justifications.environment_tag_just",
                "Environment and/or biodiversity tag justification",
                "A single sentence justification for why the environment tag label was selected.",
            ),
            FieldSpec::text(
                "impact_justifications.poverty_tag_just",
                "Poverty tag justification",
                "A single sentence justification for why the poverty tag label was selected.",
            ),
        ],
    )
}
