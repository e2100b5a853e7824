/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

use crate::common::types::*;
use crate::monitor::StatusSource;
use crate::token::TokenBackend;
use crate::storage::types::DeviceTokenRecord;
use crate::tools::{callapi::call_api, error::AppError};
use async_trait::async_trait;
use reqwest::{Method, Url};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct OrganizationRecord {
    pub id: String,
    pub name: String,
    pub status: EntityStatus,
}

#[derive(Debug, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub status: EntityStatus,
}

#[derive(Debug, Deserialize)]
pub struct ApiSuccess {
    pub success: bool,
}

#[derive(Debug, Serialize)]
struct TokenUploadReq<'a> {
    token: &'a str,
    user_id: &'a str,
    role: Role,
    organization_id: &'a str,
    platform: PlatformKind,
}

fn endpoint(base_url: &Url, segments: &[&str]) -> Url {
    let mut url = base_url.clone();
    {
        let mut path = url.path_segments_mut().expect("Invalid base URL");
        for segment in segments {
            path.push(segment);
        }
    }
    url
}

/// Status reads against the REST data API. There is no server-side
/// filtered endpoint; the entity is found by id client-side from the full
/// collection.
pub struct RestStatusSource {
    base_url: Url,
    auth_token: AuthToken,
}

impl RestStatusSource {
    pub fn new(base_url: Url, auth_token: AuthToken) -> Self {
        RestStatusSource {
            base_url,
            auth_token,
        }
    }
}

#[async_trait]
impl StatusSource for RestStatusSource {
    async fn organization_status(
        &self,
        organization_id: &OrganizationId,
    ) -> Result<Option<EntityStatus>, AppError> {
        let url = endpoint(&self.base_url, &["organizations"]);
        let auth_token = self.auth_token.inner();
        let organizations: Vec<OrganizationRecord> = call_api(
            Method::GET,
            &url,
            vec![
                ("content-type", "application/json"),
                ("token", auth_token.as_str()),
            ],
            None::<()>,
        )
        .await
        .map_err(|err| AppError::ExternalAPICallFailed(err.to_string()))?;

        Ok(organizations
            .into_iter()
            .find(|organization| organization.id == organization_id.inner())
            .map(|organization| organization.status))
    }

    async fn user_status(&self, user_id: &UserId) -> Result<Option<EntityStatus>, AppError> {
        let url = endpoint(&self.base_url, &["users"]);
        let auth_token = self.auth_token.inner();
        let users: Vec<UserRecord> = call_api(
            Method::GET,
            &url,
            vec![
                ("content-type", "application/json"),
                ("token", auth_token.as_str()),
            ],
            None::<()>,
        )
        .await
        .map_err(|err| AppError::ExternalAPICallFailed(err.to_string()))?;

        Ok(users
            .into_iter()
            .find(|user| user.id == user_id.inner())
            .map(|user| user.status))
    }
}

/// Push-token mirror to the notification backend. Both endpoints are
/// fire-and-forget; the response body is ignored beyond the success flag.
pub struct RestTokenBackend {
    base_url: Url,
    auth_token: AuthToken,
}

impl RestTokenBackend {
    pub fn new(base_url: Url, auth_token: AuthToken) -> Self {
        RestTokenBackend {
            base_url,
            auth_token,
        }
    }

    async fn post_token(&self, segments: &[&str], record: &DeviceTokenRecord) -> Result<(), AppError> {
        let url = endpoint(&self.base_url, segments);
        let (token, user_id, organization_id) = (
            record.token.inner(),
            record.user_id.inner(),
            record.organization_id.inner(),
        );
        let request_body = TokenUploadReq {
            token: &token,
            user_id: &user_id,
            role: record.role,
            organization_id: &organization_id,
            platform: record.platform,
        };
        let auth_token = self.auth_token.inner();
        let _resp: ApiSuccess = call_api(
            Method::POST,
            &url,
            vec![
                ("content-type", "application/json"),
                ("token", auth_token.as_str()),
            ],
            Some(request_body),
        )
        .await
        .map_err(|err| AppError::ExternalAPICallFailed(err.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl TokenBackend for RestTokenBackend {
    async fn upload_token(&self, record: &DeviceTokenRecord) -> Result<(), AppError> {
        self.post_token(&["notifications", "fcm-token"], record)
            .await?;
        self.post_token(&["notifications", "save-token"], record)
            .await
    }
}
