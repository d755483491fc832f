//! Document store implementation of PostsRepository.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};

use crate::domain::{NewPost, Post, PostPatch, RepositoryError};
use crate::ports::PostsRepository;

const POSTS_COLLECTION: &str = "posts";

/// Document store implementation of the PostsRepository port.
pub struct MongoPostsRepository {
    collection: Collection<PostDocument>,
}

impl MongoPostsRepository {
    /// Creates a repository over the `posts` collection of the given database.
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(POSTS_COLLECTION),
        }
    }
}

/// Stored shape of a post.
///
/// The id is absent on insert so the server assigns one.
#[derive(Debug, Serialize, Deserialize)]
struct PostDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    title: String,
    body: String,
}

impl TryFrom<PostDocument> for Post {
    type Error = RepositoryError;

    fn try_from(document: PostDocument) -> Result<Self, Self::Error> {
        let id = document
            .id
            .ok_or_else(|| RepositoryError::backend("Post document missing _id"))?;
        Ok(Post {
            id: id.to_hex(),
            title: document.title,
            body: document.body,
        })
    }
}

fn parse_object_id(entity: &'static str, id: &str) -> Result<ObjectId, RepositoryError> {
    ObjectId::parse_str(id).map_err(|_| RepositoryError::invalid_id(entity, id))
}

fn patch_document(patch: &PostPatch) -> Document {
    let mut set = Document::new();
    if let Some(title) = patch.title() {
        set.insert("title", title);
    }
    if let Some(body) = patch.body() {
        set.insert("body", body);
    }
    set
}

#[async_trait]
impl PostsRepository for MongoPostsRepository {
    async fn list(&self) -> Result<Vec<Post>, RepositoryError> {
        let cursor = self
            .collection
            .find(doc! {})
            .await
            .map_err(RepositoryError::backend)?;
        let documents: Vec<PostDocument> = cursor
            .try_collect()
            .await
            .map_err(RepositoryError::backend)?;
        documents.into_iter().map(Post::try_from).collect()
    }

    async fn find(&self, id: &str) -> Result<Option<Post>, RepositoryError> {
        let object_id = parse_object_id("post", id)?;
        let document = self
            .collection
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(RepositoryError::backend)?;
        document.map(Post::try_from).transpose()
    }

    async fn create(&self, new_post: NewPost) -> Result<Post, RepositoryError> {
        let document = PostDocument {
            id: None,
            title: new_post.title().to_string(),
            body: new_post.body().to_string(),
        };
        let result = self
            .collection
            .insert_one(&document)
            .await
            .map_err(RepositoryError::backend)?;
        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| RepositoryError::backend("Insert returned no object id"))?;
        Ok(Post {
            id: id.to_hex(),
            title: document.title,
            body: document.body,
        })
    }

    async fn update(&self, id: &str, patch: PostPatch) -> Result<Option<Post>, RepositoryError> {
        let object_id = parse_object_id("post", id)?;
        let updated = self
            .collection
            .find_one_and_update(doc! { "_id": object_id }, doc! { "$set": patch_document(&patch) })
            .return_document(ReturnDocument::After)
            .await
            .map_err(RepositoryError::backend)?;
        updated.map(Post::try_from).transpose()
    }

    async fn delete(&self, id: &str) -> Result<bool, RepositoryError> {
        let object_id = parse_object_id("post", id)?;
        let result = self
            .collection
            .delete_one(doc! { "_id": object_id })
            .await
            .map_err(RepositoryError::backend)?;
        Ok(result.deleted_count > 0)
    }
}
