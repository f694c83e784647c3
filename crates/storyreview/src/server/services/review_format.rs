//! The structured review layout shared by the prompt and the fallback review
//!
//! Both the "RESPONSE FORMAT" block sent to the model and the degraded-mode
//! review are rendered from the tables below, so the two cannot drift apart.

pub const SCORES_HEADING: &str = "PARAMETER SCORES:";
pub const RECOMMENDATIONS_HEADING: &str = "IMPROVEMENT RECOMMENDATIONS:";
pub const SUMMARY_HEADING: &str = "SUMMARY:";
pub const BULLET: &str = "•";

pub const CRITERION_MAX: u8 = 20;
pub const OVERALL_MAX: u8 = 100;
pub const RECOMMENDATION_COUNT: usize = 3;

/// One scored review dimension
#[derive(Debug, Clone, Copy)]
pub struct Criterion {
  pub label: &'static str,
  pub question: &'static str,
}

pub const CRITERIA: [Criterion; 5] = [
  Criterion { label: "Clarity", question: "Is the story easy to understand and unambiguous?" },
  Criterion {
    label: "Completeness",
    question: "Are acceptance criteria and preconditions well-defined?",
  },
  Criterion {
    label: "Business Value",
    question: "Does it reflect tangible healthcare value (patient safety, compliance, efficiency)?",
  },
  Criterion { label: "Testability", question: "Can QA engineers easily derive test cases from it?" },
  Criterion {
    label: "Technical Feasibility",
    question: "Is it practically implementable within healthcare system constraints?",
  },
];

/// A complete review in the fixed layout
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewReport {
  pub scores: [String; 5],
  pub overall: String,
  pub recommendations: [String; RECOMMENDATION_COUNT],
  pub summary: String,
}

impl ReviewReport {
  /// The review returned whenever generation fails
  pub fn fallback() -> Self {
    Self {
      scores: [15, 12, 16, 14, 13].map(|score: u8| score.to_string()),
      overall: 70.to_string(),
      recommendations: [
        "Define specific acceptance criteria for healthcare compliance requirements".to_string(),
        "Clarify patient data handling and privacy protection measures".to_string(),
        "Add details about integration with existing clinical workflows".to_string(),
      ],
      summary: "The user story has a clear purpose but requires more specific healthcare context \
                and detailed acceptance criteria to ensure proper implementation in a regulated \
                clinical environment."
        .to_string(),
    }
  }

  /// The layout with placeholders, as requested from the model
  pub fn template() -> Self {
    Self {
      scores: std::array::from_fn(|_| "[number]".to_string()),
      overall: "[number]".to_string(),
      recommendations: std::array::from_fn(|i| {
        format!("[Specific actionable recommendation {}]", i + 1)
      }),
      summary: "[2-3 sentence overall assessment focusing on healthcare context and \
                implementation readiness]"
        .to_string(),
    }
  }

  pub fn render(&self) -> String {
    let mut lines = vec![SCORES_HEADING.to_string()];
    for (criterion, score) in CRITERIA.iter().zip(&self.scores) {
      lines.push(format!("{BULLET} {}: {score}/{CRITERION_MAX}", criterion.label));
    }
    lines.push(format!("{BULLET} Overall Score: {}/{OVERALL_MAX}", self.overall));
    lines.push(String::new());

    lines.push(RECOMMENDATIONS_HEADING.to_string());
    for recommendation in &self.recommendations {
      lines.push(format!("{BULLET} {recommendation}"));
    }
    lines.push(String::new());

    lines.push(SUMMARY_HEADING.to_string());
    lines.push(self.summary.clone());

    lines.join("\n")
  }
}

/// Numbered list of the criteria with their guiding questions
pub fn criteria_checklist() -> String {
  CRITERIA
    .iter()
    .enumerate()
    .map(|(i, criterion)| {
      format!("{}. {}: {}", i + 1, criterion.label.to_uppercase(), criterion.question)
    })
    .collect::<Vec<_>>()
    .join("\n")
}

/// Degraded-mode review text
pub fn fallback_review() -> String {
  ReviewReport::fallback().render()
}
