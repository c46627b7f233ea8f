//! Duplicate and fraud detection over the current link records.
//!
//! Both checks are read-only aggregations. Everything follows insertion
//! order: members and handles are listed in the order they were first seen.

use rollcall_shared::MemberId;
use rollcall_store::LinkRecord;

use crate::aliasing::GroupSession;
use crate::error::Result;

/// A member who posted more than one link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiLinkMember {
    pub member_id: MemberId,
    /// Name on the member's latest link.
    pub display_name: String,
    /// Every link of the member, oldest first.
    pub links: Vec<LinkRecord>,
}

/// One member's claim on a handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleClaim {
    pub member_id: MemberId,
    pub display_name: String,
    pub url: String,
}

/// A handle posted by more than one distinct member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossAttributedHandle {
    pub handle: String,
    /// Every link row carrying the handle, oldest first.
    pub claims: Vec<HandleClaim>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FraudReport {
    pub multi_link_members: Vec<MultiLinkMember>,
    pub cross_attributed_handles: Vec<CrossAttributedHandle>,
}

impl FraudReport {
    pub fn is_clean(&self) -> bool {
        self.multi_link_members.is_empty() && self.cross_attributed_handles.is_empty()
    }
}

impl GroupSession<'_> {
    pub fn multi_link_members(&self) -> Result<Vec<MultiLinkMember>> {
        Ok(multi_link_members(&self.db.list_links(self.group())?))
    }

    pub fn cross_attributed_handles(&self) -> Result<Vec<CrossAttributedHandle>> {
        Ok(cross_attributed_handles(&self.db.list_links(self.group())?))
    }

    /// Both checks over a single read of the link table.
    pub fn fraud_report(&self) -> Result<FraudReport> {
        let links = self.db.list_links(self.group())?;
        Ok(FraudReport {
            multi_link_members: multi_link_members(&links),
            cross_attributed_handles: cross_attributed_handles(&links),
        })
    }
}

/// Members with more than one link.  `links` must be in insertion order.
pub fn multi_link_members(links: &[LinkRecord]) -> Vec<MultiLinkMember> {
    let mut grouped: Vec<MultiLinkMember> = Vec::new();

    for link in links {
        match grouped.iter_mut().find(|m| m.member_id == link.member_id) {
            Some(member) => {
                member.display_name = link.member_name.clone();
                member.links.push(link.clone());
            }
            None => grouped.push(MultiLinkMember {
                member_id: link.member_id,
                display_name: link.member_name.clone(),
                links: vec![link.clone()],
            }),
        }
    }

    grouped.retain(|m| m.links.len() > 1);
    grouped
}

/// Handles claimed by more than one distinct member.  Handles compare
/// exactly, so `Alice` and `alice` are different handles.
pub fn cross_attributed_handles(links: &[LinkRecord]) -> Vec<CrossAttributedHandle> {
    let mut grouped: Vec<CrossAttributedHandle> = Vec::new();

    for link in links {
        let claim = HandleClaim {
            member_id: link.member_id,
            display_name: link.member_name.clone(),
            url: link.url.clone(),
        };
        match grouped.iter_mut().find(|h| h.handle == link.handle) {
            Some(handle) => handle.claims.push(claim),
            None => grouped.push(CrossAttributedHandle {
                handle: link.handle.clone(),
                claims: vec![claim],
            }),
        }
    }

    grouped.retain(|h| {
        h.claims
            .iter()
            .any(|c| c.member_id != h.claims[0].member_id)
    });
    grouped
}
