use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::model::{AccountId, GroupId};
use crate::domain::repository::Result;

/// `{ "code", "msg", "data" }` wrapper used by every backend response
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub code: i64,
    #[serde(default)]
    pub msg: Option<String>,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn into_result(self) -> Result<Option<T>> {
        if self.code == 200 {
            Ok(self.data)
        } else {
            Err(DomainError::Backend {
                code: self.code,
                message: self.msg.unwrap_or_default(),
            })
        }
    }
}

/// Message of an error response, when the body is an envelope at all
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub msg: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreatedId {
    pub id: GroupId,
}

#[derive(Debug, Deserialize)]
pub struct AffectedCount {
    pub affected_count: u64,
}

#[derive(Debug, Serialize)]
pub struct MoveAccountBody {
    pub account_id: AccountId,
    pub group_id: Option<GroupId>,
}

#[derive(Debug, Serialize)]
pub struct BatchMoveBody<'a> {
    pub account_ids: &'a [AccountId],
    pub group_id: GroupId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope() {
        let envelope: Envelope<CreatedId> =
            serde_json::from_value(json!({ "code": 200, "msg": "ok", "data": { "id": 12 } })).unwrap();
        assert_eq!(envelope.into_result().unwrap().unwrap().id, 12);
    }

    #[test]
    fn test_missing_data_is_none() {
        let envelope: Envelope<Vec<CreatedId>> =
            serde_json::from_slice(br#"{"code":200,"msg":"deleted"}"#).unwrap();
        assert!(envelope.into_result().unwrap().is_none());
    }

    #[test]
    fn test_null_data() {
        let envelope: Envelope<CreatedId> =
            serde_json::from_value(json!({ "code": 200, "msg": null, "data": null })).unwrap();
        assert!(envelope.into_result().unwrap().is_none());
    }

    #[test]
    fn test_backend_error_code() {
        let envelope: Envelope<CreatedId> =
            serde_json::from_value(json!({ "code": 400, "msg": "name exists", "data": null })).unwrap();
        match envelope.into_result() {
            Err(DomainError::Backend { code, message }) => {
                assert_eq!(code, 400);
                assert_eq!(message, "name exists");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_move_body_shape() {
        let body = serde_json::to_value(MoveAccountBody {
            account_id: 1,
            group_id: None,
        })
        .unwrap();
        assert_eq!(body, json!({ "account_id": 1, "group_id": null }));

        let ids = [1, 2];
        let batch = serde_json::to_value(BatchMoveBody {
            account_ids: &ids,
            group_id: 5,
        })
        .unwrap();
        assert_eq!(batch, json!({ "account_ids": [1, 2], "group_id": 5 }));
    }
}
