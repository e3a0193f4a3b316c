//! Etymology bucketing of positioned headings.
//!
//! Pages carry no explicit nesting. Every Etymology heading opens a bucket
//! that runs until the next one, and the remaining headings fall into
//! whichever bucket's interval holds their position.

use kotoba_core::{EtymologyBucket, HeadingCategory, Position, PositionedHeading};

/// A bucket removed for having neither pronunciation nor part-of-speech
/// headings. Its Etymology section may still point at another page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyBucket<P = Position> {
    pub index: usize,
    pub heading: Option<PositionedHeading<P>>,
    pub start: Option<P>,
    pub end: Option<P>,
}

impl<P> From<EtymologyBucket<P>> for EmptyBucket<P> {
    fn from(bucket: EtymologyBucket<P>) -> Self {
        Self {
            index: bucket.index,
            heading: bucket.heading,
            start: bucket.start,
            end: bucket.end,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout<P = Position> {
    /// Non-empty buckets in page order.
    pub buckets: Vec<EtymologyBucket<P>>,
    pub discarded: Vec<EmptyBucket<P>>,
    /// Headings before the first Etymology heading that no bucket took.
    pub leading: Vec<PositionedHeading<P>>,
}

impl<P> Layout<P> {
    /// No structured data survived. A normal outcome, not an error.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Groups `headings` into etymology buckets.
///
/// Input order does not matter; headings are sorted by position first.
/// Without any Etymology heading one implicit bucket spans the whole
/// document. A page whose only Pronunciation heading sits above the first
/// etymology shares it with bucket 0.
pub fn infer<P: Ord + Clone>(headings: &[PositionedHeading<P>]) -> Layout<P> {
    let mut sorted: Vec<&PositionedHeading<P>> = headings.iter().collect();
    sorted.sort_by(|a, b| a.position.cmp(&b.position));

    let etymologies: Vec<&PositionedHeading<P>> = sorted
        .iter()
        .copied()
        .filter(|h| h.category == HeadingCategory::Etymology)
        .collect();

    let mut buckets: Vec<EtymologyBucket<P>> = if etymologies.is_empty() {
        vec![EtymologyBucket::new(0, None, None, None)]
    } else {
        etymologies
            .iter()
            .enumerate()
            .map(|(i, heading)| {
                EtymologyBucket::new(
                    i,
                    Some((*heading).clone()),
                    Some(heading.position.clone()),
                    etymologies.get(i + 1).map(|next| next.position.clone()),
                )
            })
            .collect()
    };

    let pronunciation_count = sorted
        .iter()
        .filter(|h| h.category == HeadingCategory::Pronunciation)
        .count();

    let mut leading = Vec::new();
    for heading in sorted
        .iter()
        .copied()
        .filter(|h| h.category != HeadingCategory::Etymology)
    {
        match buckets.iter().position(|b| b.contains(&heading.position)) {
            Some(i) => assign(&mut buckets[i], heading.clone()),
            None if heading.category == HeadingCategory::Pronunciation
                && pronunciation_count == 1 =>
            {
                buckets[0].pronunciation_headings.push(heading.clone());
            }
            None => {
                tracing::debug!(
                    category = heading.category.as_str(),
                    label = %heading.label,
                    "Discarding heading above the first etymology"
                );
                leading.push(heading.clone());
            }
        }
    }

    for bucket in &mut buckets {
        bucket.pos_usage = claim_usage_notes(bucket);
    }

    let (buckets, empty): (Vec<_>, Vec<_>) = buckets.into_iter().partition(|b| !b.is_empty());
    for bucket in &empty {
        tracing::debug!(index = bucket.index, "Removing empty etymology bucket");
    }

    Layout {
        buckets,
        discarded: empty.into_iter().map(EmptyBucket::from).collect(),
        leading,
    }
}

fn assign<P>(bucket: &mut EtymologyBucket<P>, heading: PositionedHeading<P>) {
    match heading.category {
        HeadingCategory::Pronunciation => bucket.pronunciation_headings.push(heading),
        HeadingCategory::PartOfSpeech => bucket.pos_headings.push(heading),
        HeadingCategory::UsageNotes => bucket.usage_headings.push(heading),
        HeadingCategory::Etymology => {}
    }
}

/// Each part of speech claims the first unclaimed usage note between its
/// own heading and the next part of speech (or the bucket's end).
fn claim_usage_notes<P: Ord>(bucket: &EtymologyBucket<P>) -> Vec<Option<usize>> {
    let mut claimed = vec![false; bucket.usage_headings.len()];

    bucket
        .pos_headings
        .iter()
        .enumerate()
        .map(|(i, pos)| {
            let end = bucket
                .pos_headings
                .get(i + 1)
                .map(|next| &next.position)
                .or(bucket.end.as_ref());
            let found = bucket.usage_headings.iter().enumerate().find(|(j, usage)| {
                !claimed[*j]
                    && pos.position <= usage.position
                    && end.is_none_or(|e| usage.position < *e)
            });
            found.map(|(j, _)| {
                claimed[j] = true;
                j
            })
        })
        .collect()
}
