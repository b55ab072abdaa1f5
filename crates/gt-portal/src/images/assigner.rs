use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use super::candidate::Candidate;
use super::catalog::Slot;
use super::scoring::score;

/// What a single slot received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotOutcome {
    pub slot: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate: Option<Candidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
}

impl SlotOutcome {
    pub fn is_assigned(&self) -> bool {
        self.candidate.is_some()
    }
}

/// Result of [`assign`]: one outcome per slot, in slot order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub outcomes: Vec<SlotOutcome>,
}

impl Assignment {
    pub fn get(&self, slot: &str) -> Option<&Candidate> {
        self.outcomes
            .iter()
            .find(|outcome| outcome.slot == slot)
            .and_then(|outcome| outcome.candidate.as_ref())
    }

    pub fn assigned(&self) -> impl Iterator<Item = (&str, &Candidate)> {
        self.outcomes.iter().filter_map(|outcome| {
            outcome
                .candidate
                .as_ref()
                .map(|candidate| (outcome.slot.as_str(), candidate))
        })
    }

    pub fn missing(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|outcome| !outcome.is_assigned())
            .map(|outcome| outcome.slot.as_str())
            .collect()
    }

    pub fn assigned_count(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.is_assigned()).count()
    }
}

/// Greedy per-slot assignment.
///
/// The pool is shuffled once, then each slot in order takes the remaining
/// candidate with the highest [`score`]; equal scores go to whichever came
/// first in the shuffled pool. Later slots only see what earlier slots left.
pub fn assign<R>(candidates: Vec<Candidate>, slots: &[Slot], rng: &mut R) -> Assignment
where
    R: Rng + ?Sized,
{
    let mut pool = candidates;
    pool.shuffle(rng);

    let mut outcomes = Vec::with_capacity(slots.len());
    for slot in slots {
        let Some((index, best)) = best_match(&pool, &slot.keywords) else {
            debug!(slot = %slot.target_name, "candidate pool exhausted");
            outcomes.push(SlotOutcome {
                slot: slot.target_name.clone(),
                candidate: None,
                score: None,
            });
            continue;
        };

        let candidate = pool.remove(index);
        info!(
            slot = %slot.target_name,
            candidate = %candidate.name,
            source = %candidate.source,
            score = best,
            "slot assigned"
        );
        outcomes.push(SlotOutcome {
            slot: slot.target_name.clone(),
            candidate: Some(candidate),
            score: Some(best),
        });
    }

    Assignment { outcomes }
}

fn best_match(pool: &[Candidate], keywords: &[String]) -> Option<(usize, u32)> {
    let mut best: Option<(usize, u32)> = None;
    for (index, candidate) in pool.iter().enumerate() {
        let current = score(&candidate.name, keywords);
        match best {
            Some((_, top)) if current <= top => {}
            _ => best = Some((index, current)),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn candidate(name: &str) -> Candidate {
        Candidate::new(name, name, name, "test")
    }

    fn pool(names: &[&str]) -> Vec<Candidate> {
        names.iter().map(|name| candidate(name)).collect()
    }

    #[test]
    fn keyword_matches_win_their_slots() {
        let slots = vec![
            Slot::new("hero", "", ["praia", "vista"]),
            Slot::new("sobre", "", ["turistico", "ponto"]),
        ];
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let assignment = assign(
                pool(&["praia-azul.jpg", "centro-historico.jpg", "ponto-turistico.jpg"]),
                &slots,
                &mut rng,
            );
            assert_eq!(assignment.get("hero").map(|c| c.name.as_str()), Some("praia-azul.jpg"));
            assert_eq!(
                assignment.get("sobre").map(|c| c.name.as_str()),
                Some("ponto-turistico.jpg")
            );
            assert_eq!(assignment.outcomes[0].score, Some(1));
            assert_eq!(assignment.outcomes[1].score, Some(2));
        }
    }

    #[test]
    fn never_reuses_a_candidate() {
        let slots: Vec<Slot> = (0..5)
            .map(|idx| Slot::new(format!("slot-{idx}"), "", ["praia"]))
            .collect();
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let assignment = assign(
                pool(&["praia-1.jpg", "praia-2.jpg", "cidade.jpg", "praia-3.png"]),
                &slots,
                &mut rng,
            );
            let ids: Vec<_> = assignment.assigned().map(|(_, c)| c.id.clone()).collect();
            let unique: HashSet<_> = ids.iter().collect();
            assert_eq!(ids.len(), unique.len());
            assert_eq!(assignment.assigned_count(), 4);
        }
    }

    #[test]
    fn assigned_candidate_has_the_best_remaining_score() {
        let slots = vec![
            Slot::new("a", "", ["cidade", "centro"]),
            Slot::new("b", "", ["praia", "vista", "aerea"]),
            Slot::new("c", "", ["cultura"]),
        ];
        let names = [
            "cidade-centro.jpg",
            "cidade.jpg",
            "praia-vista-aerea.jpg",
            "praia.jpg",
            "cultura-cidade.png",
            "outra.jpg",
        ];
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let assignment = assign(pool(&names), &slots, &mut rng);
            let mut remaining = pool(&names);
            for (slot, outcome) in slots.iter().zip(&assignment.outcomes) {
                let chosen = outcome.candidate.as_ref().expect("pool is large enough");
                let max = remaining
                    .iter()
                    .map(|c| score(&c.name, &slot.keywords))
                    .max()
                    .expect("non-empty pool");
                assert_eq!(score(&chosen.name, &slot.keywords), max);
                remaining.retain(|c| c.id != chosen.id);
            }
        }
    }

    #[test]
    fn empty_pool_leaves_every_slot_missing() {
        let catalog = crate::images::SlotCatalog::standard();
        let mut rng = StdRng::seed_from_u64(3);
        let assignment = assign(Vec::new(), catalog.slots(), &mut rng);
        assert_eq!(assignment.assigned_count(), 0);
        assert_eq!(
            assignment.missing(),
            vec!["hero-paraiba.jpg", "hero-interno-paraiba.jpg", "sobre-paraiba.jpg"]
        );
    }

    #[test]
    fn short_pool_leaves_the_last_slots_missing() {
        let slots: Vec<Slot> = ["first", "second", "third", "fourth"]
            .iter()
            .map(|name| Slot::new(*name, "", Vec::<String>::new()))
            .collect();
        let mut rng = StdRng::seed_from_u64(11);
        let assignment = assign(pool(&["a.jpg", "b.jpg"]), &slots, &mut rng);
        assert_eq!(assignment.missing(), vec!["third", "fourth"]);
    }

    #[test]
    fn empty_keywords_follow_the_shuffled_order() {
        let slots = vec![
            Slot::new("x", "", Vec::<String>::new()),
            Slot::new("y", "", Vec::<String>::new()),
        ];
        let names = ["a.jpg", "b.jpg", "c.jpg", "d.jpg"];

        let mut shuffled = pool(&names);
        shuffled.shuffle(&mut StdRng::seed_from_u64(5));

        let assignment = assign(pool(&names), &slots, &mut StdRng::seed_from_u64(5));
        assert_eq!(assignment.get("x"), Some(&shuffled[0]));
        assert_eq!(assignment.get("y"), Some(&shuffled[1]));
    }

    #[test]
    fn duplicate_names_are_tracked_by_identity() {
        let slots = vec![
            Slot::new("one", "", ["praia"]),
            Slot::new("two", "", ["praia"]),
        ];
        let candidates = vec![
            Candidate::new("paraiba/praia.jpg", "praia.jpg", "paraiba/praia.jpg", "paraiba"),
            Candidate::new("cabedelo/praia.jpg", "praia.jpg", "cabedelo/praia.jpg", "cabedelo"),
        ];
        let mut rng = StdRng::seed_from_u64(9);
        let assignment = assign(candidates, &slots, &mut rng);
        let one = assignment.get("one").expect("first slot filled");
        let two = assignment.get("two").expect("second slot filled");
        assert_eq!(one.name, two.name);
        assert_ne!(one.id, two.id);
    }

    #[test]
    fn same_seed_reproduces_the_assignment() {
        let catalog = crate::images::SlotCatalog::standard();
        let names = ["a.jpg", "b.jpg", "c.jpg", "d.jpg", "e.jpg", "cidade.png"];
        let first = assign(pool(&names), catalog.slots(), &mut StdRng::seed_from_u64(77));
        let second = assign(pool(&names), catalog.slots(), &mut StdRng::seed_from_u64(77));
        assert_eq!(first, second);
    }
}
