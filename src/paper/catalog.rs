use serde::{Deserialize, Serialize};

/// Mark denominations the bank accepts; every template tier draws from
/// exactly one of these pools.
pub(crate) const MARK_VALUES: [i64; 3] = [2, 5, 10];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum TemplateKind {
    Ia,
    Semester,
}

impl TemplateKind {
    pub(crate) fn template(self) -> &'static PaperTemplate {
        match self {
            Self::Ia => &IA,
            Self::Semester => &SEMESTER,
        }
    }
}

pub(crate) struct PaperTemplate {
    pub(crate) kind: TemplateKind,
    pub(crate) name: &'static str,
    /// Emitted verbatim before any tier; empty strings become spacers.
    pub(crate) preamble: &'static [&'static str],
    pub(crate) tiers: &'static [QuotaTier],
}

pub(crate) struct QuotaTier {
    /// Section label, e.g. "Question 1".
    pub(crate) label: &'static str,
    pub(crate) mark_value: i64,
    /// Minimum pool size before this tier can be emitted at all.
    pub(crate) required: usize,
    /// How many questions are drawn into the paper.
    pub(crate) select: usize,
    pub(crate) heading: &'static str,
    pub(crate) instruction: Option<&'static str>,
    /// Index of an earlier tier whose picks must not reappear here.
    pub(crate) excludes: Option<usize>,
    /// Present when the tier's picks are printed as labeled sub-groups.
    pub(crate) split: Option<TierSplit>,
}

pub(crate) struct TierSplit {
    pub(crate) group_size: usize,
    pub(crate) labels: &'static [&'static str],
    pub(crate) heading: &'static str,
}

pub(crate) static IA: PaperTemplate = PaperTemplate {
    kind: TemplateKind::Ia,
    name: "IA Paper",
    preamble: &[
        "Time : 1 Hour",
        "Max Marks : 20",
        "",
        "1. Attempt the following questions:",
        "2. Avoid using any unfair means during the paper.",
        "",
    ],
    tiers: &[
        QuotaTier {
            label: "Question 1",
            mark_value: 2,
            required: 6,
            select: 6,
            heading: "Any five questions - 2 marks each",
            instruction: Some("(Choose 5 from the following 6 questions)"),
            excludes: None,
            split: None,
        },
        QuotaTier {
            label: "Question 2",
            mark_value: 5,
            required: 2,
            select: 2,
            heading: "Any one question - 5 marks",
            instruction: Some("(Choose 1 from the following 2 questions)"),
            excludes: None,
            split: None,
        },
        QuotaTier {
            label: "Question 3",
            mark_value: 5,
            required: 4,
            select: 2,
            heading: "Any one question - 5 marks",
            instruction: Some("(Choose 1 from the following 2 questions)"),
            excludes: Some(1),
            split: None,
        },
    ],
};

pub(crate) static SEMESTER: PaperTemplate = PaperTemplate {
    kind: TemplateKind::Semester,
    name: "Semester Paper",
    preamble: &[
        "Time : 3 Hours",
        "Max Marks : 100",
        "",
        "1. Answer all questions.",
        "2. All questions carry equal marks.",
        "3. Attempt any 3 questions from Q2 to Q6.",
        "4. Avoid using any unfair means during the paper.",
        "",
    ],
    tiers: &[
        QuotaTier {
            label: "Question 1",
            mark_value: 5,
            required: 4,
            select: 4,
            heading: "Compulsory questions - 5 marks each",
            instruction: None,
            excludes: None,
            split: None,
        },
        QuotaTier {
            label: "Questions 2-6",
            mark_value: 10,
            required: 10,
            select: 10,
            heading: "Answer both sub-questions (10 marks each) - Total 20 marks",
            instruction: None,
            excludes: None,
            split: Some(TierSplit {
                group_size: 2,
                labels: &["Question 2", "Question 3", "Question 4", "Question 5", "Question 6"],
                heading: "Answer both sub-questions (10 marks each) - Total 20 marks",
            }),
        },
    ],
};
