//! The fixed intent taxonomy.
//!
//! Declaration order is load-bearing: it is the iteration order for
//! knowledge-base search and the tie-break order for keyword
//! classification, so new intents must be appended, not inserted.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A category label describing what the user is asking about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    ApplicationProcess,
    Requirements,
    Timeline,
    Compensation,
    Location,
    SelectionProcess,
    ProgramDetails,
    CompanyCulture,
    Preparation,
    GeneralInfo,
    Greeting,
    Goodbye,
    /// Anything not related to internships. Never catalogued.
    Other,
}

impl Intent {
    /// All intents in declaration order.
    pub const ALL: [Intent; 13] = [
        Intent::ApplicationProcess,
        Intent::Requirements,
        Intent::Timeline,
        Intent::Compensation,
        Intent::Location,
        Intent::SelectionProcess,
        Intent::ProgramDetails,
        Intent::CompanyCulture,
        Intent::Preparation,
        Intent::GeneralInfo,
        Intent::Greeting,
        Intent::Goodbye,
        Intent::Other,
    ];

    /// The wire label for this intent.
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::ApplicationProcess => "application_process",
            Intent::Requirements => "requirements",
            Intent::Timeline => "timeline",
            Intent::Compensation => "compensation",
            Intent::Location => "location",
            Intent::SelectionProcess => "selection_process",
            Intent::ProgramDetails => "program_details",
            Intent::CompanyCulture => "company_culture",
            Intent::Preparation => "preparation",
            Intent::GeneralInfo => "general_info",
            Intent::Greeting => "greeting",
            Intent::Goodbye => "goodbye",
            Intent::Other => "other",
        }
    }

    /// Parse a wire label. Returns `None` for anything outside the taxonomy.
    pub fn parse(label: &str) -> Option<Intent> {
        Intent::ALL.iter().copied().find(|i| i.as_str() == label)
    }

    /// Short description used when enumerating the taxonomy in prompts.
    pub fn description(&self) -> &'static str {
        match self {
            Intent::ApplicationProcess => "Questions about how to apply for internships",
            Intent::Requirements => {
                "Questions about eligibility, skills, or qualifications needed"
            }
            Intent::Timeline => {
                "Questions about application deadlines, program duration, start dates"
            }
            Intent::Compensation => "Questions about salary, stipends, benefits",
            Intent::Location => "Questions about where internships are located, remote work",
            Intent::SelectionProcess => {
                "Questions about interviews, assessments, selection criteria"
            }
            Intent::ProgramDetails => {
                "Questions about what interns will do, projects, mentorship"
            }
            Intent::CompanyCulture => {
                "Questions about work environment, dress code, office culture"
            }
            Intent::Preparation => {
                "Questions about how to prepare for internships or interviews"
            }
            Intent::GeneralInfo => "General questions about internships",
            Intent::Greeting => "Greetings and conversation starters",
            Intent::Goodbye => "Farewell messages",
            Intent::Other => "Anything not related to internships",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
