//! Matchmaker: tag sanitization and the best-match scan over the waiting set.

use uuid::Uuid;

use super::session::SessionRegistry;

/// Whether strict and non-strict users may be paired with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// Strict and non-strict pools stay separate.
    #[default]
    SameStrictness,
    /// Anyone can match anyone; the looser-wins filter rule still protects
    /// the strict member of a mixed pairing.
    Mixed,
}

const MAX_TAGS: usize = 16;

/// Lowercase, strip markup characters, drop empties, dedupe preserving
/// order. Returns an empty vec when nothing survives.
pub fn sanitize_tags(raw: &[String]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw {
        let clean: String = tag
            .chars()
            .filter(|c| !matches!(c, '<' | '>' | '&' | '"' | '\''))
            .collect::<String>()
            .trim()
            .to_lowercase();
        if clean.is_empty() || tags.contains(&clean) {
            continue;
        }
        tags.push(clean);
        if tags.len() == MAX_TAGS {
            break;
        }
    }
    tags
}

fn score(a: &[String], b: &[String]) -> usize {
    a.iter().filter(|t| b.contains(t)).count()
}

/// Scan the waiting set for the candidate sharing the most tags with the
/// requester. At least one common tag is required. Ties go to the earliest
/// insertion: a later candidate only wins with a strictly better score.
///
/// O(waiting x tags); fine at single-process scale, and the bound to revisit
/// if this ever needs to shard.
pub fn best_match(
    registry: &SessionRegistry,
    waiting: &[Uuid],
    requester: Uuid,
    tags: &[String],
    strict: bool,
    policy: MatchPolicy,
) -> Option<Uuid> {
    let mut best: Option<(Uuid, usize)> = None;
    for candidate_id in waiting {
        if *candidate_id == requester {
            continue;
        }
        let Some(candidate) = registry.get(candidate_id) else {
            continue;
        };
        if policy == MatchPolicy::SameStrictness && candidate.strict != strict {
            continue;
        }
        let s = score(tags, &candidate.tags);
        if s > 0 && best.is_none_or(|(_, b)| s > b) {
            best = Some((*candidate_id, s));
        }
    }
    best.map(|(id, _)| id)
}
