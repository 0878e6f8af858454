//! Help resources and contact actions shown after an analysis.
//! Contact actions only acknowledge; nothing is sent or stored.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SupportResource {
    pub title: &'static str,
    pub url: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SupportServices {
    pub status: &'static str,
    pub notice: &'static str,
    pub resources: Vec<SupportResource>,
}

pub fn support_services() -> SupportServices {
    SupportServices {
        status: "Locating services in your area...",
        notice: "Please allow location access in your browser to find nearby services.",
        resources: vec![
            SupportResource {
                title: "National Mental Health Hotline",
                url: "tel:988",
            },
            SupportResource {
                title: "Online Directory of Mental Health Providers",
                url: "https://www.psychologytoday.com/us/therapists",
            },
        ],
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContactOption {
    SendToDoctor,
    ShareWithFamily,
    SaveReport,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ContactError {
    #[error("a doctor's email is required")]
    MissingDoctorEmail,
    #[error("a family member contact is required")]
    MissingFamilyContact,
}

impl ContactOption {
    pub fn label(&self) -> &'static str {
        match self {
            Self::SendToDoctor => "Send results to my doctor",
            Self::ShareWithFamily => "Share with family member",
            Self::SaveReport => "Save report for later",
        }
    }

    /// Confirmation text for the chosen action.
    pub fn acknowledge(&self, contact: Option<&str>) -> Result<String, ContactError> {
        let contact = contact.map(str::trim).filter(|c| !c.is_empty());
        match (self, contact) {
            (Self::SendToDoctor, Some(email)) => Ok(format!("Report would be sent to {email}")),
            (Self::SendToDoctor, None) => Err(ContactError::MissingDoctorEmail),
            (Self::ShareWithFamily, Some(who)) => Ok(format!("Results would be shared with {who}")),
            (Self::ShareWithFamily, None) => Err(ContactError::MissingFamilyContact),
            (Self::SaveReport, _) => Ok("Report saved. You can access it in your account.".to_string()),
        }
    }
}
