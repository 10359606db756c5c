//! Per-user delivery preference.

use crate::model::actor::UserId;
use crate::model::notice_type::NoticeTypeId;
use serde::{Deserialize, Serialize};

/// Delivery preference keyed by (user, notice type, medium).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeSetting {
    pub user_id: UserId,
    pub notice_type_id: NoticeTypeId,
    pub medium_id: String,
    pub send: bool,
}
