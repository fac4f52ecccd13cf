use std::collections::{HashMap, HashSet};

use rand::Rng;
use thiserror::Error;

use crate::db::models::Question;
use crate::paper::catalog::{PaperTemplate, QuotaTier, MARK_VALUES};
use crate::paper::Block;

#[derive(Debug, Error)]
pub(crate) enum AssembleError {
    #[error("template {template} references unmapped mark value {mark}")]
    UnmappedMark { template: &'static str, mark: i64 },
}

#[derive(Debug)]
pub(crate) struct AssembledPaper {
    pub(crate) blocks: Vec<Block>,
    /// Ids of the drawn questions in paper order.
    pub(crate) question_ids: Vec<i64>,
}

/// Draws questions from `pool` according to the template's tier quotas and
/// emits the paper as an ordered block sequence. Shortfalls never fail:
/// a tier that cannot be filled degrades to a single `Note` block.
pub(crate) fn assemble<R: Rng + ?Sized>(
    template: &PaperTemplate,
    pool: &[Question],
    rng: &mut R,
) -> Result<AssembledPaper, AssembleError> {
    let mut by_mark: HashMap<i64, Vec<&Question>> =
        MARK_VALUES.iter().map(|mark| (*mark, Vec::new())).collect();
    for question in pool {
        if let Some(bucket) = by_mark.get_mut(&question.marks) {
            bucket.push(question);
        }
    }

    let mut blocks = Vec::new();
    for line in template.preamble {
        if line.is_empty() {
            blocks.push(Block::Spacer);
        } else {
            blocks.push(Block::Heading { text: (*line).to_string() });
        }
    }

    let mut question_ids = Vec::new();
    // Picks per tier, kept so later tiers can exclude them. A degraded tier
    // contributes an empty pick list and therefore excludes nothing.
    let mut picks: Vec<Vec<i64>> = Vec::with_capacity(template.tiers.len());
    let mut number: u32 = 1;

    for (index, tier) in template.tiers.iter().enumerate() {
        if index > 0 {
            blocks.push(Block::Spacer);
        }

        let tier_pool = by_mark.get(&tier.mark_value).ok_or(AssembleError::UnmappedMark {
            template: template.name,
            mark: tier.mark_value,
        })?;

        if tier_pool.len() < tier.required {
            blocks.push(Block::Note {
                text: format!(
                    "{} : Insufficient {}-mark questions available (Available: {}, Required: {})",
                    tier.label,
                    tier.mark_value,
                    tier_pool.len(),
                    tier.required
                ),
            });
            picks.push(Vec::new());
            continue;
        }

        let candidates: Vec<&Question> = match tier.excludes {
            Some(earlier) => {
                let taken: HashSet<i64> = picks[earlier].iter().copied().collect();
                tier_pool.iter().copied().filter(|q| !taken.contains(&q.id)).collect()
            }
            None => tier_pool.clone(),
        };

        if candidates.len() < tier.select {
            blocks.push(Block::Note {
                text: format!(
                    "{} : Not enough unique {}-mark questions available",
                    tier.label, tier.mark_value
                ),
            });
            picks.push(Vec::new());
            continue;
        }

        let chosen: Vec<&Question> = rand::seq::index::sample(rng, candidates.len(), tier.select)
            .iter()
            .map(|i| candidates[i])
            .collect();

        emit_tier(tier, &chosen, &mut blocks, &mut number);
        question_ids.extend(chosen.iter().map(|q| q.id));
        picks.push(chosen.iter().map(|q| q.id).collect());
    }

    Ok(AssembledPaper { blocks, question_ids })
}

fn emit_tier(tier: &QuotaTier, chosen: &[&Question], blocks: &mut Vec<Block>, number: &mut u32) {
    match &tier.split {
        Some(split) => {
            for (group, label) in chosen.chunks(split.group_size).zip(split.labels) {
                if *label != split.labels[0] {
                    blocks.push(Block::Spacer);
                }
                blocks.push(Block::Heading { text: format!("{} : {}", label, split.heading) });
                for question in group {
                    blocks.push(Block::Line { number: *number, text: question.prompt.clone() });
                    *number += 1;
                }
            }
        }
        None => {
            blocks.push(Block::Heading { text: format!("{} : {}", tier.label, tier.heading) });
            if let Some(instruction) = tier.instruction {
                blocks.push(Block::Heading { text: instruction.to_string() });
            }
            for question in chosen {
                blocks.push(Block::Line { number: *number, text: question.prompt.clone() });
                *number += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paper::catalog::{TemplateKind, IA, SEMESTER};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use time::macros::datetime;

    fn question(id: i64, marks: i64) -> Question {
        Question {
            id,
            user_id: Some(1),
            subject_id: 1,
            topic_id: 1,
            prompt: format!("Prompt {id}"),
            answer: None,
            marks,
            difficulty: 3,
            created_at: datetime!(2026-01-01 0:00),
            updated_at: datetime!(2026-01-01 0:00),
        }
    }

    fn pool(twos: usize, fives: usize, tens: usize) -> Vec<Question> {
        let mut pool = Vec::new();
        let mut id = 1;
        for _ in 0..twos {
            pool.push(question(id, 2));
            id += 1;
        }
        for _ in 0..fives {
            pool.push(question(id, 5));
            id += 1;
        }
        for _ in 0..tens {
            pool.push(question(id, 10));
            id += 1;
        }
        pool
    }

    fn line_numbers(blocks: &[Block]) -> Vec<u32> {
        blocks
            .iter()
            .filter_map(|block| match block {
                Block::Line { number, .. } => Some(*number),
                _ => None,
            })
            .collect()
    }

    fn note_count(blocks: &[Block]) -> usize {
        blocks.iter().filter(|block| matches!(block, Block::Note { .. })).count()
    }

    #[test]
    fn ia_with_sufficient_pool_emits_no_notes() {
        let pool = pool(6, 4, 0);
        let mut rng = StdRng::seed_from_u64(7);
        let paper = assemble(&IA, &pool, &mut rng).unwrap();

        assert_eq!(note_count(&paper.blocks), 0);
        assert_eq!(line_numbers(&paper.blocks), (1..=10).collect::<Vec<u32>>());
        assert_eq!(paper.question_ids.len(), 10);
        assert!(paper.blocks.iter().any(|block| matches!(
            block,
            Block::Heading { text } if text == "Question 1 : Any five questions - 2 marks each"
        )));
        assert!(paper.blocks.iter().any(|block| matches!(
            block,
            Block::Heading { text } if text == "(Choose 5 from the following 6 questions)"
        )));
    }

    #[test]
    fn ia_third_section_never_repeats_second_section_picks() {
        let pool = pool(6, 4, 0);
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let paper = assemble(&IA, &pool, &mut rng).unwrap();
            let five_mark_ids: Vec<i64> =
                paper.question_ids.iter().copied().filter(|id| *id > 6).collect();
            assert_eq!(five_mark_ids.len(), 4);
            let unique: HashSet<i64> = five_mark_ids.iter().copied().collect();
            assert_eq!(unique.len(), 4, "seed {seed} repeated a 5-mark question");
        }
    }

    #[test]
    fn ia_shortfall_degrades_to_single_note() {
        // Tier 3 needs 4 five-mark questions in the pool; only 2 exist.
        let pool = pool(6, 2, 2);
        let mut rng = StdRng::seed_from_u64(3);
        let paper = assemble(&IA, &pool, &mut rng).unwrap();

        assert_eq!(note_count(&paper.blocks), 1);
        assert_eq!(line_numbers(&paper.blocks), (1..=8).collect::<Vec<u32>>());
        assert!(paper.blocks.iter().any(|block| matches!(
            block,
            Block::Note { text } if text.contains("(Available: 2, Required: 4)")
        )));
    }

    #[test]
    fn semester_groups_carry_their_own_labels() {
        let pool = pool(0, 4, 10);
        let mut rng = StdRng::seed_from_u64(11);
        let paper = assemble(&SEMESTER, &pool, &mut rng).unwrap();

        assert_eq!(note_count(&paper.blocks), 0);
        assert_eq!(line_numbers(&paper.blocks), (1..=14).collect::<Vec<u32>>());
        for label in ["Question 2", "Question 3", "Question 4", "Question 5", "Question 6"] {
            let expected =
                format!("{label} : Answer both sub-questions (10 marks each) - Total 20 marks");
            assert!(
                paper.blocks.iter().any(
                    |block| matches!(block, Block::Heading { text } if *text == expected)
                ),
                "missing heading for {label}"
            );
        }
    }

    #[test]
    fn semester_without_ten_mark_pool_still_produces_compulsory_section() {
        let pool = pool(0, 4, 0);
        let mut rng = StdRng::seed_from_u64(5);
        let paper = assemble(&SEMESTER, &pool, &mut rng).unwrap();

        assert_eq!(note_count(&paper.blocks), 1);
        assert_eq!(line_numbers(&paper.blocks), vec![1, 2, 3, 4]);
    }

    #[test]
    fn seeded_assembly_is_deterministic() {
        let pool = pool(6, 4, 0);
        let first = assemble(&IA, &pool, &mut StdRng::seed_from_u64(42)).unwrap();
        let second = assemble(&IA, &pool, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(first.blocks, second.blocks);
        assert_eq!(first.question_ids, second.question_ids);
    }

    static TIGHT_EXCLUSION: PaperTemplate = PaperTemplate {
        kind: TemplateKind::Ia,
        name: "Tight Exclusion",
        preamble: &[],
        tiers: &[
            QuotaTier {
                label: "Question 1",
                mark_value: 5,
                required: 2,
                select: 2,
                heading: "First draw",
                instruction: None,
                excludes: None,
                split: None,
            },
            QuotaTier {
                label: "Question 2",
                mark_value: 5,
                required: 2,
                select: 2,
                heading: "Second draw",
                instruction: None,
                excludes: Some(0),
                split: None,
            },
        ],
    };

    #[test]
    fn exclusion_shortfall_degrades_instead_of_failing() {
        // Three candidates, first tier takes two, second needs two more.
        let pool = pool(0, 3, 0);
        let mut rng = StdRng::seed_from_u64(9);
        let paper = assemble(&TIGHT_EXCLUSION, &pool, &mut rng).unwrap();

        assert_eq!(note_count(&paper.blocks), 1);
        assert!(paper.blocks.iter().any(|block| matches!(
            block,
            Block::Note { text } if text.contains("Not enough unique")
        )));
        assert_eq!(line_numbers(&paper.blocks), vec![1, 2]);
    }

    static DEGRADED_PRIOR: PaperTemplate = PaperTemplate {
        kind: TemplateKind::Ia,
        name: "Degraded Prior",
        preamble: &[],
        tiers: &[
            QuotaTier {
                label: "Question 1",
                mark_value: 5,
                required: 5,
                select: 5,
                heading: "First draw",
                instruction: None,
                excludes: None,
                split: None,
            },
            QuotaTier {
                label: "Question 2",
                mark_value: 5,
                required: 4,
                select: 2,
                heading: "Second draw",
                instruction: None,
                excludes: Some(0),
                split: None,
            },
        ],
    };

    #[test]
    fn degraded_prior_tier_excludes_nothing() {
        let pool = pool(0, 4, 0);
        let mut rng = StdRng::seed_from_u64(13);
        let paper = assemble(&DEGRADED_PRIOR, &pool, &mut rng).unwrap();

        // Tier 1 degrades (4 < 5); tier 2 draws from the untouched pool.
        assert_eq!(note_count(&paper.blocks), 1);
        assert_eq!(line_numbers(&paper.blocks), vec![1, 2]);
    }

    static UNMAPPED: PaperTemplate = PaperTemplate {
        kind: TemplateKind::Ia,
        name: "Unmapped",
        preamble: &[],
        tiers: &[QuotaTier {
            label: "Question 1",
            mark_value: 3,
            required: 1,
            select: 1,
            heading: "Broken",
            instruction: None,
            excludes: None,
            split: None,
        }],
    };

    #[test]
    fn unmapped_mark_value_is_a_configuration_error() {
        let pool = pool(1, 1, 1);
        let mut rng = StdRng::seed_from_u64(1);
        let err = assemble(&UNMAPPED, &pool, &mut rng).unwrap_err();
        assert!(matches!(err, AssembleError::UnmappedMark { mark: 3, .. }));
    }
}
