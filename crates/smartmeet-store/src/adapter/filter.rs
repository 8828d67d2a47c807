//! Filter emulation for distribution queries.
//!
//! The backing store answers one predicate per call, so combined filters are
//! emulated: push the status equality down (the store supports it), fetch
//! the candidate set, then apply owner and method predicates in memory over
//! the reassembled rows. Owner resolution batches the two-hop chain into a
//! single id-in-set minutes query instead of one lookup per row.
//!
//! This is O(total rows) per call. Acceptable for the small volumes this
//! system holds; it does not scale and is not pretending to.

use std::collections::HashMap;

use smartmeet_core::entities::{DeliveryMethod, DeliveryStatus, Distribution, Recipient};

use crate::adapter::{distributions, tables};
use crate::client::StoreClient;
use crate::errors::Result;
use crate::rows::{decode, AttendeeRow, MinutesRow, SocialPostRow};

/// Predicate combination for distribution listing and counting.
#[derive(Clone, Debug, Default)]
pub struct DistributionFilter {
    /// Restrict to distributions whose resolved owner matches. Rows whose
    /// owner chain is broken never match an owner filter.
    pub owner: Option<String>,
    /// Restrict by delivery status (pushed down to the store).
    pub status: Option<DeliveryStatus>,
    /// Restrict by delivery method (applied in memory).
    pub method: Option<DeliveryMethod>,
}

/// List distributions matching the filter, newest first.
pub fn list(client: &StoreClient, filter: &DistributionFilter) -> Result<Vec<Distribution>> {
    let mut query = client
        .select(tables::SOCIAL_POSTS)
        .order_desc("created_at");
    if let Some(status) = filter.status {
        query = query.eq("status", status.as_str());
    }
    let posts: Vec<SocialPostRow> = query
        .fetch()?
        .into_iter()
        .map(decode)
        .collect::<Result<_>>()?;

    let template_ids: Vec<&str> = {
        let mut ids: Vec<&str> = posts.iter().map(|p| p.meeting_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    };

    let owners: HashMap<String, Option<String>> = client
        .select(tables::MINUTES)
        .in_set("meeting_id", template_ids.clone())
        .fetch()?
        .into_iter()
        .map(|row| {
            let minutes: MinutesRow = decode(row)?;
            Ok((minutes.meeting_id.clone(), minutes.created_by))
        })
        .collect::<Result<_>>()?;

    let recipients: HashMap<String, Vec<Recipient>> = client
        .select(tables::ATTENDEES)
        .in_set("meeting_id", template_ids)
        .fetch()?
        .into_iter()
        .map(|row| {
            let attendees: AttendeeRow = decode(row)?;
            let list = distributions::parse_recipients(&attendees.attendees);
            Ok((attendees.meeting_id, list))
        })
        .collect::<Result<_>>()?;

    Ok(posts
        .iter()
        .filter_map(|post| {
            let owner = owners.get(&post.meeting_id).cloned().flatten();
            if let Some(wanted) = &filter.owner {
                // Broken chains resolve to no owner and are dropped from
                // owner-scoped results.
                if owner.as_deref() != Some(wanted.as_str()) {
                    return None;
                }
            }
            let dist = distributions::from_parts(
                post,
                recipients.get(&post.meeting_id).cloned().unwrap_or_default(),
                owner,
            );
            if let Some(method) = filter.method {
                if dist.method != method {
                    return None;
                }
            }
            Some(dist)
        })
        .collect())
}

/// Count distributions matching the filter. Same traversal as [`list`];
/// owner-scoped counts count broken-chain rows as zero.
pub fn count(client: &StoreClient, filter: &DistributionFilter) -> Result<usize> {
    Ok(list(client, filter)?.len())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
