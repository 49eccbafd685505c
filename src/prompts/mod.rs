//! Prompt templates for the evaluation stages.
//!
//! Each pipeline stage has one builder function that renders the full
//! prompt string from its inputs. Rubric and taxonomy text is kept as
//! data ([`INNOVATION_LEVELS`], [`GEO_LOC_LABELS`],
//! [`IMPACT_AREA_OBJECTIVES`], [`IMPACT_AREA_LABELS`]) so the stages
//! share one rendering path instead of re-declaring the tables inline.

/// One rung of the innovation-readiness ladder.
#[derive(Debug, Clone, Copy)]
pub struct InnovationLevel {
    pub level: u8,
    pub title: &'static str,
    pub definition: &'static str,
}

/// The innovation-readiness ladder, levels 0 through 9.
pub const INNOVATION_LEVELS: [InnovationLevel; 10] = [
    InnovationLevel {
        level: 0,
        title: "Idea",
        definition: "The innovation is in the idea stage. The innovation is not yet being \
                     implemented.",
    },
    InnovationLevel {
        level: 1,
        title: "Basic Research",
        definition: "The innovation's basic principles are being researched for their ability \
                     to achieve an impact.",
    },
    InnovationLevel {
        level: 2,
        title: "Formulation",
        definition: "The innovation's basic principles are being formulated or designed.",
    },
    InnovationLevel {
        level: 3,
        title: "Proof of Concept",
        definition: "The innovation's key concepts have been validated for their ability to \
                     achieve a specific impact.",
    },
    InnovationLevel {
        level: 4,
        title: "Controlled Testing",
        definition: "The innovation is being tested for its ability to achieve a specific \
                     impact under fully-controlled conditions.",
    },
    InnovationLevel {
        level: 5,
        title: "Model/Early Prototype",
        definition: "The innovation is validated for its ability to achieve a specific impact \
                     under fully-controlled conditions.",
    },
    InnovationLevel {
        level: 6,
        title: "Semi-controlled Testing",
        definition: "The innovation is being tested for its ability to achieve a specific \
                     impact under semi-controlled conditions.",
    },
    InnovationLevel {
        level: 7,
        title: "Prototype",
        definition: "The innovation is validated for its ability to achieve a specific impact \
                     under semi-controlled conditions.",
    },
    InnovationLevel {
        level: 8,
        title: "Uncontrolled Testing",
        definition: "The innovation is being tested for its ability to achieve a specific \
                     impact under uncontrolled conditions.",
    },
    InnovationLevel {
        level: 9,
        title: "Proven Innovation",
        definition: "The innovation is validated for its ability to achieve a specific impact \
                     under uncontrolled conditions.",
    },
];

/// Geographic-focus label definitions for the tag stage.
pub const GEO_LOC_LABELS: &str = "\
The labels for Geographic focus are: 'Global', 'Regional', 'National', 'Sub-national'.
The labels for Region are all the United Nations geoscheme subregions.
The labels for Country are any of the countries in the world.
";

/// Lookup table of strategic impact-area objectives.
pub const IMPACT_AREA_OBJECTIVES: &str = "\
Below is a lookup table of CGIAR strategic objectives and their definitions.

| Impact Area | Impact Area Abbreviation | Objective |
| Gender equality, youth and social inclusion | Gender | To close the gender gap in rights to economic resources, access to ownership and control over land and natural resources for over 500 million women who work in food, land and water systems. |
| Gender equality, youth and social inclusion | Gender | To offer rewardable opportunities to 267 million young people who are not in employment, education or training. |
| Climate adaptation and mitigation | Climate | Turn agriculture and forest systems into a net sink for carbon by 2050 (Climate Mitigation target). |
| Climate adaptation and mitigation | Climate | Equip 500 million small-scale producers to be more resilient by 2030 to climate shocks, with climate adaptation solutions available through national innovation systems (Climate Adaptation target). |
| Climate adaptation and mitigation | Climate | Support countries in implementing National Adaptation Plans and Nationally Determined Contributions, and increased ambition in climate actions by 2030 (Climate Policy target). This support could possibly be in the form of education or training. |
| Nutrition, health and food security | Nutrition | To end hunger for all and enable affordable, healthy diets for the 3 billion people who do not currently have access to safe and nutritious food. |
| Nutrition, health and food security | Nutrition | To reduce cases of foodborne illness (600 million annually) and zoonotic disease (1 billion annually) by one third. |
| Environmental health and biodiversity | Environment | Stay within planetary and regional environmental boundaries: 1. consumptive water use in food production of less than 2,500 km3 per year (with a focus on the most stressed basins) 2. zero net deforestation 3. nitrogen application of 90 Tg per year (with a redistribution towards low-input farming systems) and increased use efficiency; and phosphorus application of 10 Tg per year. |
| Environmental health and biodiversity | Environment | Maintain the genetic diversity of seed varieties, cultivated plants and farmed and domesticated animals and their related wild species, including through soundly managed genebanks at the national, regional, and international levels. |
| Environmental health and biodiversity | Environment | In addition, water conservation and management, restoration of degraded lands/soils, restoration of biodiversity in situ, and management of pollution related to food systems are key areas of environmental impacts to which the CGIAR should contribute. |
| Environmental health and biodiversity | Environment | All of the 2030 targets that are organized as part of the 4 long-term goals for 2050 included in the Kunming-Montreal Global Biodiversity Framework. |
| Environmental health and biodiversity | Environment | All of the targets and indicators included in UN Sustainable Development Goals 2, 6, 12, 14, 15 and 17 |
| Poverty reduction, livelihoods and jobs | Poverty | Lift at least 500 million people living in rural areas above the extreme poverty line of US $1.90 per day (2011 PPP). |
| Poverty reduction, livelihoods and jobs | Poverty | Reduce by at least half the proportion of men, women and children of all ages living in poverty in all its dimensions, according to national definitions. |
";

/// Definitions of the impact-area tag labels.
pub const IMPACT_AREA_LABELS: &str = "\
The Impact Area labels are defined as follows:

| Tag | Objective |
| Principal | The research activity principally addresses one of the objectives for the impact area. The impact area is the main objective of the research activity and fundamental to its design and expected results. The research activity would not have been undertaken without consideration of this impact area. |
| Significant | The research activity contributes in significant ways to the impact area, even though it is not the principal focus of the activity. The impact area is an important and deliberate objective of the research activity but not the main reason for its undertaking. |
| Not Targeted | The research activity has not been found to target any aspect of the impact area. |
";

/// Renders the innovation-readiness ladder as the `<innovation_levels>`
/// XML table embedded in the summary and tag prompts.
pub fn render_innovation_levels() -> String {
    let mut table = String::from("<innovation_levels>\n");
    for level in INNOVATION_LEVELS {
        table.push_str(&format!(
            "<row><level>{}</level><title>{}</title><definition>{}</definition></row>\n",
            level.level, level.title, level.definition
        ));
    }
    table.push_str("</innovation_levels>");
    table
}

/// Builds the extraction prompt shared by both report kinds.
pub fn build_extraction_prompt(format_instructions: &str, text: &str) -> String {
    format!(
        "You are a researcher at CGIAR. Your task is to review reports submitted by other \
         researchers and evaluate how innovative they are across a number of dimensions. A \
         researcher has submitted the following research results containing key points about \
         the research they conducted. Extract the necessary information from the document \
         provided and return this information as a JSON instance.\n\n\
         {format_instructions}\n\n\
         The text you are extracting information from can be found below.\n\n\
         {text}"
    )
}

/// Builds the evidence-summary prompt for the readiness report.
///
/// The model is asked to quote relevant evidence into a private
/// `<thinking>` scratchpad, then produce a 500-word academic summary
/// between `<summary></summary>` tags.
pub fn build_readiness_summary_prompt(
    short_title: &str,
    description: &str,
    evidence: &str,
) -> String {
    let levels = render_innovation_levels();
    format!(
        "You are a researcher at CGIAR. Your task is to review projects submitted by other \
         researchers and evaluate them across a number of dimensions.\n\n\
         This task consists of the following steps:\n\
         Step 1: Review the project title and its description. Stop and think about it. This \
         will provide you a general understanding of the evidence that will be presented in \
         the next step.\n\
         Step 2: Review the evidence provided.\n\
         Step 3: Review the table inside the XML tags <innovation_levels></innovation_levels>. \
         This table will be useful in carrying out the next step.\n\
         Step 4: Generate a list of quotes from the evidence that highlight the important \
         activities that took place as well as the findings made and any results. Identify if \
         activities carried out are ideations, the development of basic principles, or the \
         validation or testing of well-defined hypotheses. Also include quotes that \
         characterize the setting for the activities carried out. Reflect on if the evidence \
         contains well-defined hypotheses that are being validated or tested under \
         fully-controlled conditions, semi-controlled conditions or uncontrolled conditions. \
         It may be useful to reference the innovation levels (1 through 9) during this step. \
         Finally, make sure to take note of if this innovation is a technological innovation, \
         a capacity development innovation or a policy/organizational/institutional \
         innovation. Write quotes down word for word inside <thinking></thinking> XML tags. \
         This is a space for you to write down relevant content and will not be shown to the \
         user.\n\
         Step 5: Using the quotes inside <thinking></thinking>, write a 500 word summary in a \
         professional, academic 3rd person voice. IMPORTANT: It is critical that you \
         distinguish activities which have been carried out from activities which have been \
         planned but not yet carried out. Make sure to recount all major activities that took \
         place within the evidence. In addition to all major activities, the summary should \
         identify any potential innovations that might result from the activities noted and \
         make sure to explicitly state them. Finally, close the summary by restating all key \
         findings and next steps discussed.\n\
         Step 6: Review the summary written in step 5. If necessary re-write it to emphasize \
         conciseness without losing any details. Return the summary without any introduction \
         between <summary></summary> XML tags.\n\
         IMPORTANT: Keep in mind that the audience consists of academic researchers. Never \
         refer to yourself in the first person in this summary. Be sure to read the entire \
         set of instructions carefully before beginning. Do not go to the next step without \
         making sure the previous step has been completed.\n\
         <project_title>\n{short_title}\n</project_title>\n\
         <description>\n{description}\n</description>\n\
         {levels}\n\
         <evidence>\n{evidence}\n</evidence>"
    )
}

/// Builds the readiness tag prompt consuming the evidence summary.
pub fn build_readiness_tag_prompt(format_instructions: &str, summary: &str) -> String {
    let levels = render_innovation_levels();
    format!(
        "You are a researcher at CGIAR. Your task is to review projects submitted by other \
         researchers and evaluate them across a number of dimensions. This task consists of \
         the following steps:\n\
         Step 1: Review the summary provided. It summarizes the work carried out as part of \
         the project. Make sure to distinguish activities which were carried out from \
         activities which were only planned.\n\
         Step 2: Review the table inside the XML tags \
         <innovation_levels></innovation_levels>. It contains a scale of innovation readiness \
         that ranges from 1 to 9.\n\
         Step 3: Use the innovation readiness scale to determine the cumulative readiness \
         level of COMPLETED activities conducted as part of the project. IMPORTANT: No \
         'planned, but not-yet-completed' activities should be considered when determining \
         the readiness level.\n\
         Step 4: In a professional, academic 3rd person voice, concisely justify why you \
         selected this readiness level in at most 300 words.\n\
         IMPORTANT: Keep in mind that the audience consists of academic researchers. Never \
         refer to yourself in the first person in this summary. Refer to all actions in the \
         past tense. Be sure to read the entire set of instructions carefully before \
         beginning. Do not go to the next step without making sure the previous step has \
         been completed.\n\n\
         Innovation development refers to a new, improved, or adapted output or groups of \
         outputs such as technologies, products and services, policies, and other \
         organizational and institutional arrangements with high potential to contribute to \
         positive impacts when used at scale. Innovations may be at early stages of \
         readiness (ideation or basic research) or at more mature stages of readiness \
         (delivery and scaling).\n\n\
         {levels}\n\
         <summary>\n{summary}\n</summary>\n\
         {format_instructions}\n\
         Only return the resulting JSON object. DO NOT return any other text."
    )
}

/// Builds the evidence-summary prompt for the geographic/impact report.
pub fn build_impact_summary_prompt(
    project_title: &str,
    description: &str,
    evidence: &str,
) -> String {
    format!(
        "You are a researcher at CGIAR. Your task is to review projects submitted by other \
         researchers and evaluate them across a number of dimensions.\n\n\
         This task consists of the following steps:\n\
         Step 1: Review the project title and its description. Stop and think about it. This \
         will provide you a general understanding of the evidence that will be presented in \
         the next step.\n\
         Step 2: Review the evidence provided.\n\
         Step 3: Review the texts inside the <geographic_focus></geographic_focus> and \
         <topics_of_interest></topics_of_interest> XML tags. These texts will be useful in \
         carrying out the next step.\n\
         Step 4: Generate a list of quotes from the evidence that highlight the important \
         activities that took place as well as the findings made and any results. Also \
         include quotes that characterize the geographic focus of the aforementioned \
         activities and any topics of interest that are explicitly referenced in the \
         evidence. Write them down word for word inside <thinking></thinking> XML tags. This \
         is a space for you to write down relevant content and will not be shown to the \
         user.\n\
         Step 5: Using the quotes inside <thinking></thinking>, write a 750 word summary in \
         a professional, academic 3rd person voice. Make sure to note all major activities \
         that took place within the evidence. In addition to all major activities, the \
         summary should identify the geographic focus of these activities and make sure to \
         explicitly state any of the topics of interest if and only if they are referenced \
         in the evidence. Both geographic focus and topics of interest are clearly defined \
         below. Make sure to justify why all particular topics of interest are identified. \
         Finally, close the summary by restating all key findings.\n\
         Step 6: Review the summary written in step 5. If necessary re-write it to emphasize \
         conciseness without losing any details. Return the summary without any introduction \
         between <summary></summary> XML tags.\n\
         IMPORTANT: Keep in mind that the audience consists of academic researchers. Never \
         refer to yourself in the first person in this summary. Refer to all actions in the \
         past tense. Be sure to read the entire set of instructions carefully before \
         beginning. Do not go to the next step without making sure the previous step has \
         been completed.\n\
         <project_title>\n{project_title}\n</project_title>\n\
         <description>\n{description}\n</description>\n\
         <geographic_focus>\n\
         'Geographic focus' consists of determining if the major activities are 'Global', \
         'Regional', 'National', or 'Sub-national'. 'Regional' refers to whether the \
         activities focus on a United Nations geoscheme subregion. 'National' refers to \
         whether the activities focus on a country. 'Sub-national' refers to whether the \
         activities focus on a WHO subnational region within a country. The geographic focus \
         is the largest category that is explicitly mentioned in the context of an activity \
         carried out in the evidence.\n\
         </geographic_focus>\n\
         <topics_of_interest>\n\
         'Topics of interest' are topics that should be highlighted in the summary if they \
         are discussed because the impact of activities on these topics is especially \
         important. These topics are nutrition, health, food security, poverty reduction, \
         livelihood, jobs, gender equality, youth inclusion, social inclusion, climate \
         adaptation, climate mitigation, environmental health, and biodiversity.\n\
         </topics_of_interest>\n\
         <evidence>\n{evidence}\n</evidence>"
    )
}

/// Builds the geographic/impact tag prompt consuming the evidence summary.
pub fn build_impact_tag_prompt(format_instructions: &str, summary: &str) -> String {
    format!(
        "You are a researcher at CGIAR. Your task is to review projects submitted by other \
         researchers and determine the appropriate label for these projects for 8 \
         dimensions. Three of these dimensions are 'Geographic focus', 'Region' and \
         'Country'. They are collectively referred to as 'Geographic Location'.\n\
         The remaining 5 dimensions are 'Gender equality, youth and social inclusion', \
         'Climate adaptation and mitigation', 'Nutrition, health and food security', \
         'Environmental health and biodiversity' and 'Poverty reduction, livelihoods and \
         jobs'. These dimensions are collectively referred to as 'Impact Areas'.\n\
         Another researcher has already prepared a summary of the project for you to use as \
         a reference for selecting the appropriate label for each dimension.\n\n\
         This task consists of two sub-tasks. The first is to determine the Geographic \
         Location labels. The second sub-task is to determine the Impact Area labels.\n\
         The steps for the first task are as follows:\n\
         Step 1: Review the sections labeled Project Title, Description, and Geographic \
         Location Labels. Geographic Location Labels provides the list of labels for each \
         dimension.\n\
         Step 2: Review the summary provided and return the labels that correspond with it \
         for 'Geographic focus', 'Region' and 'Country'.\n\
         The steps for the second task are as follows:\n\
         Step 1: Review the section labeled Impact Area Objectives. It contains a table of \
         the impact areas and the objectives that comprise each of them.\n\
         Step 2: Review the section labeled Impact Area Labels. It provides definitions of \
         the labels for labeling the Impact Areas.\n\
         IMPORTANT: Keep in mind that the audience consists of academic researchers. Never \
         refer to yourself in the first person. Refer to all actions in the past tense. Be \
         sure to read the entire set of instructions carefully before beginning. Do not go \
         to the next step without making sure the previous step has been completed.\n\n\
         Geographic Location Labels:\n{GEO_LOC_LABELS}\n\n\
         Impact Area Objectives:\n{IMPACT_AREA_OBJECTIVES}\n\n\
         Impact Area Labels:\n{IMPACT_AREA_LABELS}\n\n\
         Summary:\n{summary}\n\n\
         {format_instructions}\n\
         Only return the resulting JSON object. DO NOT return any other text."
    )
}
