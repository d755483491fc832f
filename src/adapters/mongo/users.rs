//! Document store implementation of UsersRepository.
//!
//! Username uniqueness is enforced by a unique index; the duplicate key
//! write error is translated into [`RepositoryError::Duplicate`] so the
//! HTTP layer can answer with conflict instead of a server error.

use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};

use crate::domain::{NewUser, RepositoryError, User};
use crate::ports::UsersRepository;

const USERS_COLLECTION: &str = "users";
const DUPLICATE_KEY_CODE: i32 = 11000;

/// Document store implementation of the UsersRepository port.
pub struct MongoUsersRepository {
    collection: Collection<UserDocument>,
}

impl MongoUsersRepository {
    /// Creates a repository over the `users` collection of the given database.
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(USERS_COLLECTION),
        }
    }

    /// Creates the unique username index.
    ///
    /// Callers run this once the store is reachable; signup relies on the
    /// index to reject duplicate usernames.
    pub async fn ensure_indexes(&self) -> Result<(), mongodb::error::Error> {
        let index = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(index).await?;
        Ok(())
    }
}

/// Stored shape of a user credential record.
#[derive(Debug, Serialize, Deserialize)]
struct UserDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    username: String,
    password_hash: String,
}

impl TryFrom<UserDocument> for User {
    type Error = RepositoryError;

    fn try_from(document: UserDocument) -> Result<Self, Self::Error> {
        let id = document
            .id
            .ok_or_else(|| RepositoryError::backend("User document missing _id"))?;
        Ok(User {
            id: id.to_hex(),
            username: document.username,
            password_hash: document.password_hash,
        })
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE
    )
}

#[async_trait]
impl UsersRepository for MongoUsersRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        let document = UserDocument {
            id: None,
            username: new_user.username().to_string(),
            password_hash: new_user.password_hash().to_string(),
        };
        let result = self.collection.insert_one(&document).await.map_err(|err| {
            if is_duplicate_key(&err) {
                RepositoryError::duplicate("user", document.username.as_str())
            } else {
                RepositoryError::backend(err)
            }
        })?;
        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| RepositoryError::backend("Insert returned no object id"))?;
        Ok(User {
            id: id.to_hex(),
            username: document.username,
            password_hash: document.password_hash,
        })
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let document = self
            .collection
            .find_one(doc! { "username": username })
            .await
            .map_err(RepositoryError::backend)?;
        document.map(User::try_from).transpose()
    }
}
