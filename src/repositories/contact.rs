//! # Contact Repository
//!
//! Stores contact form submissions.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, Set};
use uuid::Uuid;

use crate::models::contact;

/// A validated submission ready to persist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub enquiry_type: String,
    pub enquiry_details: String,
    pub created_at: DateTime<Utc>,
}

pub struct ContactRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ContactRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, new: NewContact) -> Result<contact::Model, DbErr> {
        contact::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(new.name),
            email: Set(new.email),
            phone: Set(new.phone),
            enquiry_type: Set(new.enquiry_type),
            enquiry_details: Set(new.enquiry_details),
            created_at: Set(new.created_at.into()),
        }
        .insert(self.db)
        .await
    }
}
