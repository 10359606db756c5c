//! Notice lifecycle use-cases.
//!
//! # Responsibility
//! - Gate seen/archived/deleted transitions behind ownership checks.
//! - Serve inbox listings, unseen counts and the per-user feed.
//!
//! # Invariants
//! - `archive` and `delete` are applied only for the recipient or a superuser.
//! - A forbidden or missing `archive` target is a silent no-op
//!   (`Completion::applied() == false`); `delete` reports both as errors.
//! - `single` is recipient-only, superusers included.
//! - `mark_seen` and `mark_all_seen` are idempotent.
//! - Transitions are conditional single-flag updates, so a concurrent
//!   archive or mark-seen on the same notice is never reverted.
//! - `mark_all_seen` and `unseen_count` share one scope: every unseen notice
//!   of the user, archived ones included.

use crate::config::NotificationConfig;
use crate::model::actor::{Actor, UserId};
use crate::model::notice::{Notice, NoticeId};
use crate::repo::notice_repo::{NoticeListQuery, NoticeRepository};
use crate::repo::RepoError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for notice lifecycle use-cases.
#[derive(Debug)]
pub enum NoticeServiceError {
    /// Referenced notice does not exist.
    NotFound(NoticeId),
    /// Actor lacks rights on the notice.
    Forbidden { notice_id: NoticeId, user_id: UserId },
    /// Persistence-layer failure; fatal for the current request.
    Storage(RepoError),
}

impl Display for NoticeServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "notice not found: {id}"),
            Self::Forbidden { notice_id, user_id } => {
                write!(f, "user {user_id} may not access notice {notice_id}")
            }
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoticeServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for NoticeServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Storage(other),
        }
    }
}

/// Completion signal for mutating operations.
///
/// The boundary performs navigation; `next` is only a hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Number of notices whose state changed.
    pub affected: usize,
    pub next: Option<String>,
}

impl Completion {
    fn new(affected: usize, next: Option<String>) -> Self {
        Self { affected, next }
    }

    pub fn applied(&self) -> bool {
        self.affected > 0
    }
}

/// Notice lifecycle facade over a repository implementation.
pub struct NoticeService<R: NoticeRepository> {
    repo: R,
    notices_location: String,
    feed_item_limit: u32,
}

impl<R: NoticeRepository> NoticeService<R> {
    pub fn new(repo: R, config: &NotificationConfig) -> Self {
        Self {
            repo,
            notices_location: config.notices_location.clone(),
            feed_item_limit: config.feed_item_limit,
        }
    }

    /// Returns the notice when `actor` is its recipient.
    pub fn single(&self, actor: Actor, id: NoticeId) -> Result<Notice, NoticeServiceError> {
        let notice = self.load(id)?;
        if notice.recipient != actor.user_id {
            warn!(
                "event=notice_view module=service status=forbidden notice_id={} user_id={}",
                id, actor.user_id
            );
            return Err(NoticeServiceError::Forbidden {
                notice_id: id,
                user_id: actor.user_id,
            });
        }
        Ok(notice)
    }

    /// Views a notice as its recipient and marks it seen.
    pub fn open_notice(&self, actor: Actor, id: NoticeId) -> Result<Notice, NoticeServiceError> {
        let mut notice = self.single(actor, id)?;
        self.mark_seen(&mut notice)?;
        Ok(notice)
    }

    /// Marks `notice` seen at the storage boundary and mirrors it locally.
    ///
    /// Ownership is the caller's responsibility. Returns `true` only when
    /// this call flipped the stored flag.
    pub fn mark_seen(&self, notice: &mut Notice) -> Result<bool, NoticeServiceError> {
        let changed = self.repo.mark_notice_seen(notice.id)?;
        notice.mark_seen();
        Ok(changed)
    }

    /// Archives the notice for its recipient or a superuser.
    ///
    /// Missing and forbidden targets complete without applying anything.
    pub fn archive(
        &self,
        actor: Actor,
        id: NoticeId,
        next: Option<&str>,
    ) -> Result<Completion, NoticeServiceError> {
        let next = next.map(str::to_string);
        let Some(notice) = self.repo.get_notice(id)? else {
            info!(
                "event=notice_archive module=service status=skipped reason=not_found notice_id={}",
                id
            );
            return Ok(Completion::new(0, next));
        };
        if !actor.may_manage(notice.recipient) {
            warn!(
                "event=notice_archive module=service status=skipped reason=forbidden notice_id={} user_id={}",
                id, actor.user_id
            );
            return Ok(Completion::new(0, next));
        }

        let affected = usize::from(self.repo.archive_notice(id)?);
        info!(
            "event=notice_archive module=service status=ok notice_id={} user_id={} affected={}",
            id, actor.user_id, affected
        );
        Ok(Completion::new(affected, next))
    }

    /// Deletes the notice for its recipient or a superuser.
    ///
    /// # Errors
    /// - `NotFound` when the notice does not exist.
    /// - `Forbidden` when `actor` is neither recipient nor superuser.
    pub fn delete(
        &self,
        actor: Actor,
        id: NoticeId,
        next: Option<&str>,
    ) -> Result<Completion, NoticeServiceError> {
        let notice = self.load(id)?;
        if !actor.may_manage(notice.recipient) {
            warn!(
                "event=notice_delete module=service status=forbidden notice_id={} user_id={}",
                id, actor.user_id
            );
            return Err(NoticeServiceError::Forbidden {
                notice_id: id,
                user_id: actor.user_id,
            });
        }

        self.repo.delete_notice(id)?;
        info!(
            "event=notice_delete module=service status=ok notice_id={} user_id={}",
            id, actor.user_id
        );
        Ok(Completion::new(1, next.map(str::to_string)))
    }

    /// Marks every unseen notice of `actor` seen, one write per notice.
    ///
    /// A failure leaves earlier notices updated; retrying is safe.
    pub fn mark_all_seen(&self, actor: Actor) -> Result<Completion, NoticeServiceError> {
        let query = NoticeListQuery {
            unseen_only: true,
            include_archived: true,
            ..NoticeListQuery::for_recipient(actor.user_id)
        };
        let mut affected = 0usize;
        for mut notice in self.repo.list_notices(&query)? {
            if self.mark_seen(&mut notice)? {
                affected += 1;
            }
        }
        info!(
            "event=notice_mark_all_seen module=service status=ok user_id={} affected={}",
            actor.user_id, affected
        );
        Ok(Completion::new(affected, Some(self.notices_location.clone())))
    }

    pub fn notices_for(&self, query: &NoticeListQuery) -> Result<Vec<Notice>, NoticeServiceError> {
        Ok(self.repo.list_notices(query)?)
    }

    pub fn unseen_count(&self, user_id: UserId) -> Result<u64, NoticeServiceError> {
        Ok(self.repo.unseen_count(user_id)?)
    }

    /// Non-archived notices of `actor`, newest first, for the feed exporter.
    pub fn feed_for_user(&self, actor: Actor) -> Result<Vec<Notice>, NoticeServiceError> {
        let query = NoticeListQuery {
            limit: Some(self.feed_item_limit),
            ..NoticeListQuery::for_recipient(actor.user_id)
        };
        Ok(self.repo.list_notices(&query)?)
    }

    fn load(&self, id: NoticeId) -> Result<Notice, NoticeServiceError> {
        self.repo
            .get_notice(id)?
            .ok_or(NoticeServiceError::NotFound(id))
    }
}
