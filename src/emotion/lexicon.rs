//! Built-in rule-based scorers
//!
//! - [`VaderLexicon`]: VADER compound sentiment (full VADER lexicon, with
//!   its negation, booster, capitalization and punctuation rules)
//! - [`PatternPolarity`]: averages the polarity/subjectivity of matched
//!   opinion words, with intensifiers and negation

use std::collections::HashMap;

use super::traits::{PolarityScore, PolarityScorer, SentimentScorer};

/// How many preceding tokens a negation can reach across
const NEGATION_WINDOW: usize = 3;

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "cannot", "without",
    "isnt", "arent", "wasnt", "werent", "dont", "doesnt", "didnt", "wont", "wouldnt", "cant",
    "couldnt", "shouldnt", "aint", "hardly",
];

/// (polarity, subjectivity)
const OPINIONS: &[(&str, f32, f32)] = &[
    // positive
    ("adorable", 0.5, 1.0),
    ("adore", 0.5, 0.6),
    ("amazed", 0.6, 0.9),
    ("amazing", 0.6, 0.9),
    ("awesome", 1.0, 1.0),
    ("beautiful", 0.85, 1.0),
    ("best", 1.0, 0.3),
    ("blessed", 0.6, 0.8),
    ("blissful", 0.8, 1.0),
    ("brilliant", 0.9, 1.0),
    ("calm", 0.3, 0.75),
    ("charming", 0.5, 0.8),
    ("cheerful", 0.7, 0.9),
    ("comfortable", 0.4, 0.7),
    ("confident", 0.5, 0.8),
    ("cool", 0.35, 0.65),
    ("delicious", 1.0, 1.0),
    ("delighted", 0.7, 1.0),
    ("delightful", 0.8, 1.0),
    ("ecstatic", 0.9, 1.0),
    ("elated", 0.8, 1.0),
    ("enjoyable", 0.5, 0.6),
    ("enthusiastic", 0.6, 0.9),
    ("excellent", 1.0, 1.0),
    ("excited", 0.4, 0.8),
    ("exciting", 0.3, 0.8),
    ("fabulous", 0.4, 0.9),
    ("fantastic", 0.4, 0.9),
    ("fine", 0.4, 0.5),
    ("fortunate", 0.5, 0.8),
    ("friendly", 0.4, 0.6),
    ("fun", 0.3, 0.2),
    ("generous", 0.6, 0.7),
    ("gentle", 0.3, 0.6),
    ("glad", 0.5, 1.0),
    ("glorious", 0.8, 1.0),
    ("good", 0.7, 0.6),
    ("gorgeous", 0.7, 1.0),
    ("grateful", 0.6, 0.9),
    ("great", 0.8, 0.75),
    ("happy", 0.8, 1.0),
    ("helpful", 0.5, 0.6),
    ("hopeful", 0.5, 0.8),
    ("impressive", 1.0, 1.0),
    ("incredible", 0.9, 0.9),
    ("inspiring", 0.6, 0.8),
    ("joyful", 0.8, 1.0),
    ("kind", 0.6, 0.9),
    ("love", 0.5, 0.6),
    ("loved", 0.7, 0.8),
    ("lovely", 0.5, 0.75),
    ("lucky", 0.33, 1.0),
    ("magnificent", 1.0, 1.0),
    ("marvelous", 0.9, 1.0),
    ("nice", 0.6, 1.0),
    ("outstanding", 0.5, 0.7),
    ("peaceful", 0.5, 0.8),
    ("perfect", 1.0, 1.0),
    ("pleasant", 0.73, 0.97),
    ("pleased", 0.5, 1.0),
    ("positive", 0.23, 0.55),
    ("proud", 0.8, 1.0),
    ("relieved", 0.4, 0.7),
    ("remarkable", 0.75, 0.75),
    ("satisfied", 0.5, 1.0),
    ("spectacular", 0.9, 1.0),
    ("splendid", 1.0, 1.0),
    ("stunning", 0.75, 1.0),
    ("successful", 0.75, 0.95),
    ("superb", 1.0, 1.0),
    ("sweet", 0.35, 0.65),
    ("terrific", 1.0, 1.0),
    ("thankful", 0.6, 0.8),
    ("thrilled", 0.8, 1.0),
    ("triumphant", 0.8, 0.9),
    ("upbeat", 0.6, 0.8),
    ("victorious", 0.8, 0.9),
    ("warm", 0.6, 0.6),
    ("wonderful", 1.0, 1.0),
    // negative
    ("afraid", -0.6, 0.9),
    ("agonizing", -0.8, 1.0),
    ("alarmed", -0.5, 0.8),
    ("alone", -0.3, 0.6),
    ("angry", -0.5, 1.0),
    ("annoyed", -0.4, 0.8),
    ("annoying", -0.8, 0.9),
    ("anxious", -0.25, 0.75),
    ("appalling", -0.9, 1.0),
    ("ashamed", -0.6, 0.9),
    ("awful", -1.0, 1.0),
    ("bad", -0.7, 0.67),
    ("bitter", -0.5, 0.8),
    ("boring", -1.0, 1.0),
    ("broken", -0.4, 0.5),
    ("crushed", -0.6, 0.8),
    ("cruel", -1.0, 1.0),
    ("dangerous", -0.6, 0.9),
    ("dead", -0.2, 0.4),
    ("depressed", -0.8, 1.0),
    ("depressing", -0.8, 1.0),
    ("desperate", -0.6, 0.9),
    ("devastated", -0.9, 1.0),
    ("devastating", -0.9, 1.0),
    ("difficult", -0.5, 1.0),
    ("disappointed", -0.75, 0.75),
    ("disappointing", -0.6, 0.7),
    ("disastrous", -1.0, 1.0),
    ("disgusted", -0.8, 1.0),
    ("disgusting", -1.0, 1.0),
    ("dreadful", -1.0, 1.0),
    ("empty", -0.1, 0.5),
    ("enraged", -0.9, 1.0),
    ("frightened", -0.6, 0.9),
    ("frightening", -0.7, 0.9),
    ("frustrated", -0.6, 0.9),
    ("frustrating", -0.6, 0.9),
    ("furious", -0.9, 1.0),
    ("gloomy", -0.6, 0.9),
    ("grim", -0.6, 0.8),
    ("gross", -0.6, 0.9),
    ("guilty", -0.5, 0.8),
    ("hateful", -0.9, 1.0),
    ("heartbroken", -0.9, 1.0),
    ("helpless", -0.6, 0.8),
    ("hopeless", -0.8, 1.0),
    ("horrible", -1.0, 1.0),
    ("horrified", -0.9, 1.0),
    ("hostile", -0.6, 0.8),
    ("hurt", -0.5, 0.8),
    ("irritated", -0.5, 0.8),
    ("jealous", -0.4, 0.8),
    ("lonely", -0.6, 0.9),
    ("lost", -0.3, 0.5),
    ("mad", -0.6, 1.0),
    ("mean", -0.3, 0.7),
    ("miserable", -1.0, 1.0),
    ("nasty", -1.0, 1.0),
    ("negative", -0.3, 0.4),
    ("nervous", -0.3, 0.8),
    ("outraged", -0.9, 1.0),
    ("painful", -0.7, 0.9),
    ("panicked", -0.7, 0.9),
    ("pathetic", -1.0, 1.0),
    ("poor", -0.4, 0.6),
    ("repulsive", -1.0, 1.0),
    ("revolting", -1.0, 1.0),
    ("ridiculous", -0.33, 1.0),
    ("ruined", -0.7, 0.8),
    ("sad", -0.5, 1.0),
    ("scared", -0.5, 1.0),
    ("scary", -0.5, 1.0),
    ("shocked", -0.7, 0.9),
    ("sick", -0.71, 0.86),
    ("sorry", -0.5, 1.0),
    ("stupid", -0.8, 1.0),
    ("terrible", -1.0, 1.0),
    ("terrified", -0.9, 1.0),
    ("terrifying", -0.9, 1.0),
    ("tragic", -0.75, 0.75),
    ("ugly", -0.7, 1.0),
    ("unacceptable", -0.5, 0.5),
    ("unfair", -0.5, 0.9),
    ("unhappy", -0.6, 0.9),
    ("upset", -0.3, 0.5),
    ("useless", -0.5, 0.2),
    ("vile", -1.0, 1.0),
    ("weak", -0.4, 0.6),
    ("worried", -0.3, 0.6),
    ("worse", -0.4, 0.6),
    ("worst", -1.0, 1.0),
    ("worthless", -0.8, 0.9),
    ("wretched", -1.0, 1.0),
    ("wrong", -0.5, 0.9),
];

const INTENSIFIERS: &[(&str, f32)] = &[
    ("very", 1.3),
    ("really", 1.2),
    ("so", 1.3),
    ("extremely", 1.5),
    ("absolutely", 1.4),
    ("incredibly", 1.5),
    ("totally", 1.3),
    ("completely", 1.4),
    ("deeply", 1.4),
    ("truly", 1.2),
    ("utterly", 1.5),
    ("quite", 1.1),
    ("slightly", 0.6),
    ("somewhat", 0.7),
    ("barely", 0.5),
];

/// Negated polarity is halved and flipped
const POLARITY_NEGATION: f32 = -0.5;

/// Split into lowercase word tokens, folding apostrophes ("don't" -> "dont")
fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|raw| {
            raw.chars()
                .filter(|c| c.is_alphanumeric())
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|t| !t.is_empty())
        .collect()
}

fn is_negation(token: &str) -> bool {
    NEGATIONS.contains(&token)
}

/// VADER compound sentiment
#[derive(Debug, Clone, Copy, Default)]
pub struct VaderLexicon;

impl VaderLexicon {
    pub fn new() -> Self {
        Self
    }
}

impl SentimentScorer for VaderLexicon {
    fn name(&self) -> &str {
        "vader"
    }

    fn compound(&self, text: &str) -> f32 {
        let analyzer = vader_sentiment::SentimentIntensityAnalyzer::new();
        let scores = analyzer.polarity_scores(text);
        let compound = scores.get("compound").copied().unwrap_or(0.0) as f32;
        if compound.is_finite() {
            compound.clamp(-1.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Opinion-word polarity scorer
pub struct PatternPolarity {
    opinions: HashMap<&'static str, (f32, f32)>,
    intensifiers: HashMap<&'static str, f32>,
}

impl PatternPolarity {
    pub fn new() -> Self {
        Self {
            opinions: OPINIONS.iter().map(|&(w, p, s)| (w, (p, s))).collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
        }
    }
}

impl Default for PatternPolarity {
    fn default() -> Self {
        Self::new()
    }
}

impl PolarityScorer for PatternPolarity {
    fn name(&self) -> &str {
        "pattern-polarity"
    }

    fn score(&self, text: &str) -> PolarityScore {
        let tokens = tokenize(text);
        let mut polarity_sum = 0.0f32;
        let mut subjectivity_sum = 0.0f32;
        let mut matched = 0usize;

        for (i, token) in tokens.iter().enumerate() {
            let Some(&(mut polarity, mut subjectivity)) = self.opinions.get(token.as_str()) else {
                continue;
            };

            if i > 0 {
                if let Some(&factor) = self.intensifiers.get(tokens[i - 1].as_str()) {
                    polarity = (polarity * factor).clamp(-1.0, 1.0);
                    subjectivity = (subjectivity * factor).clamp(0.0, 1.0);
                }
            }

            let start = i.saturating_sub(NEGATION_WINDOW);
            if tokens[start..i].iter().any(|t| is_negation(t)) {
                polarity *= POLARITY_NEGATION;
            }

            polarity_sum += polarity;
            subjectivity_sum += subjectivity;
            matched += 1;
        }

        if matched == 0 {
            return PolarityScore::default();
        }

        PolarityScore {
            polarity: (polarity_sum / matched as f32).clamp(-1.0, 1.0),
            subjectivity: (subjectivity_sum / matched as f32).clamp(0.0, 1.0),
        }
    }
}
