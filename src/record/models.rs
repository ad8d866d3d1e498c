use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::error::{RenderError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Course,
    Program,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Course => "course",
            Collection::Program => "program",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The API sends `null` for unset scalars and lists; read those as empty.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One completion event, as returned by the certificate API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub school_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub material_id: String,
    #[serde(rename = "type")]
    pub collection: Collection,
    #[serde(rename = "type_id", default)]
    pub collection_id: Option<String>,
    pub reference_number: String,
    #[serde(default)]
    pub metadata: Option<CourseMetadata>,
    pub created_at: DateTime<FixedOffset>,
    #[serde(default)]
    pub updated_at: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub valid_from: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub valid_until: Option<DateTime<FixedOffset>>,
    pub material: Material,
    pub talent: Talent,
    #[serde(default)]
    pub course: Option<CourseProgramItem>,
    #[serde(default)]
    pub program: Option<CourseProgramItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(rename = "admin_signature", default)]
    pub signature: Option<String>,
    #[serde(rename = "owner_certificate")]
    pub owner: Owner,
    pub school: School,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Owner {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub job_title: String,
}

impl Owner {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct School {
    #[serde(rename = "_id", default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub logo: String,
    #[serde(default)]
    pub social_url: Option<SocialUrl>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialUrl {
    #[serde(rename = "website_url", default, deserialize_with = "null_as_default")]
    pub website: String,
    #[serde(rename = "linkedin_url", default, deserialize_with = "null_as_default")]
    pub linkedin: String,
    #[serde(rename = "twitter_url", default, deserialize_with = "null_as_default")]
    pub twitter: String,
    #[serde(rename = "facebook_url", default, deserialize_with = "null_as_default")]
    pub facebook: String,
    #[serde(rename = "instagram_url", default, deserialize_with = "null_as_default")]
    pub instagram: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Talent {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub full_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub avatar: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseProgramItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<Skill>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Skill {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseMetadata {
    #[serde(default, deserialize_with = "null_as_default")]
    pub course_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub green_skill_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub levels: Vec<Level>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Level {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub learning_outcome: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub proficiency: i32,
    #[serde(default)]
    pub updated_at: Option<DateTime<FixedOffset>>,
}

/// The collection-specific part of a certificate.
#[derive(Debug, Clone, Copy)]
pub enum CertificateBody<'a> {
    Course { title: &'a str, levels: &'a [Level] },
    Program { title: &'a str, skills: &'a [Skill] },
}

impl CertificateBody<'_> {
    pub fn title(&self) -> &str {
        match self {
            CertificateBody::Course { title, .. } | CertificateBody::Program { title, .. } => {
                title
            }
        }
    }
}

impl CertificateRecord {
    /// Picks the payload `collection` points at. Fails when it is missing.
    pub fn body(&self) -> Result<CertificateBody<'_>> {
        match self.collection {
            Collection::Course => self
                .metadata
                .as_ref()
                .map(|m| CertificateBody::Course {
                    title: &m.name,
                    levels: &m.levels,
                })
                .ok_or_else(|| {
                    RenderError::InvalidRecord(format!(
                        "course certificate {} has no metadata",
                        self.reference_number
                    ))
                }),
            Collection::Program => self
                .program
                .as_ref()
                .map(|p| CertificateBody::Program {
                    title: &p.name,
                    skills: &p.skills,
                })
                .ok_or_else(|| {
                    RenderError::InvalidRecord(format!(
                        "program certificate {} has no program",
                        self.reference_number
                    ))
                }),
        }
    }

    /// Output file stem. Rejects references that would escape the output directory.
    pub fn file_stem(&self) -> Result<&str> {
        let reference = self.reference_number.as_str();
        if reference.is_empty()
            || reference == "."
            || reference.contains("..")
            || reference.contains(['/', '\\'])
        {
            return Err(RenderError::InvalidRecord(format!(
                "reference number {reference:?} is not a valid file name"
            )));
        }
        Ok(reference)
    }
}
