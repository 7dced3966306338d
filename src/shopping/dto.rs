use serde::Deserialize;

use super::repo_types::FlagsPatch;

/// PATCH body for a single shopping item; absent fields stay unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateItemRequest {
    #[serde(default)]
    pub purchased: Option<bool>,
    #[serde(default)]
    pub have_at_home: Option<bool>,
}

impl From<UpdateItemRequest> for FlagsPatch {
    fn from(r: UpdateItemRequest) -> Self {
        Self {
            purchased: r.purchased,
            have_at_home: r.have_at_home,
        }
    }
}
