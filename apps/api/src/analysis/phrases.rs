/// Candidate improvement hints. Each analysis shows three of them.
pub const SUGGESTION_POOL: [&str; 6] = [
    "Use more active verbs to describe your achievements.",
    "Include specific metrics (e.g., 'increased revenue by 20%') to ground your claims.",
    "Vary your sentence structure to avoid a robotic rhythm.",
    "Inject more personal voice when describing your career objectives.",
    "Replace generic buzzwords with specific industry terminology.",
    "Focus on 'storytelling' for your major projects rather than just listing tasks.",
];

pub const SUGGESTIONS_PER_ANALYSIS: usize = 3;

/// Transitions injected in front of every third sentence by the humanizer.
pub const TRANSITIONS: [&str; 5] = [
    "Furthermore,",
    "Additionally,",
    "In my experience,",
    "Notably,",
    "To elaborate,",
];

pub const SENTENCE_DELIMITER: &str = ". ";

/// Appended to every humanized text, even when already present.
pub const HUMANIZED_SUFFIX: &str = " (Enhanced for personal tone and flow)";
