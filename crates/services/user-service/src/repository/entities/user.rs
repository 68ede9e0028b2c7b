//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};

use domain::{User, UserSnapshot};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub display_name: String,
    pub full_name: String,
    #[sea_orm(column_type = "Text")]
    pub biography: String,
    pub gender: String,
    pub active: bool,
    pub blocked: bool,
    pub language: String,
    pub confirm_email: String,
    pub accept_terms: bool,
    pub birthdate: String,
    pub phone: String,
    /// JSON array of role names
    #[sea_orm(column_type = "Text")]
    pub roles: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity, decoding roles once.
impl From<Model> for User {
    fn from(model: Model) -> Self {
        User::from(UserSnapshot {
            // Identifiers come from an auto-increment key and are never negative.
            id: u64::try_from(model.id).unwrap_or_default(),
            username: model.username,
            email: model.email,
            display_name: model.display_name,
            full_name: model.full_name,
            biography: model.biography,
            gender: model.gender,
            active: model.active,
            blocked: model.blocked,
            language: model.language,
            confirm_email: model.confirm_email,
            accept_terms: model.accept_terms,
            birthdate: model.birthdate,
            phone: model.phone,
            roles_text: model.roles,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Active model for an insert: identifier left to the database.
pub fn insert_model(snapshot: UserSnapshot) -> ActiveModel {
    let mut active = profile_model(snapshot.clone());
    active.id = NotSet;
    active.created_at = Set(snapshot.created_at);
    active
}

/// Active model for an update: identifier pinned, creation time untouched.
pub fn update_model(snapshot: UserSnapshot, id: i64) -> ActiveModel {
    let mut active = profile_model(snapshot);
    active.id = Unchanged(id);
    active.created_at = NotSet;
    active
}

fn profile_model(s: UserSnapshot) -> ActiveModel {
    ActiveModel {
        id: NotSet,
        username: Set(s.username),
        email: Set(s.email),
        display_name: Set(s.display_name),
        full_name: Set(s.full_name),
        biography: Set(s.biography),
        gender: Set(s.gender),
        active: Set(s.active),
        blocked: Set(s.blocked),
        language: Set(s.language),
        confirm_email: Set(s.confirm_email),
        accept_terms: Set(s.accept_terms),
        birthdate: Set(s.birthdate),
        phone: Set(s.phone),
        roles: Set(s.roles_text),
        created_at: NotSet,
        updated_at: Set(s.updated_at),
    }
}
