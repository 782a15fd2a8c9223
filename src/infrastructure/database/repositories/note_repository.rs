use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, DatabaseConnection,
    EntityTrait, Order, QueryFilter, QueryOrder, Set,
};

use crate::domain::{
    DomainResult, NewNote, Note, NoteChanges, NoteQuery, NoteRepositoryInterface, NoteSortField,
    NoteSummary, SortOrder,
};
use crate::infrastructure::database::entities::note;

pub struct NoteRepository {
    db: DatabaseConnection,
}

impl NoteRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(&self, user_id: i32, id: i32) -> DomainResult<Option<note::Model>> {
        let model = note::Entity::find_by_id(id)
            .filter(note::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;
        Ok(model)
    }
}

fn note_model_to_domain(model: note::Model) -> Note {
    Note {
        id: model.id,
        title: model.title,
        content: model.content,
        category: model.category,
        user_id: model.user_id,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn sort_column(field: NoteSortField) -> note::Column {
    match field {
        NoteSortField::CreatedAt => note::Column::CreatedAt,
        NoteSortField::UpdatedAt => note::Column::UpdatedAt,
        NoteSortField::Title => note::Column::Title,
        NoteSortField::Category => note::Column::Category,
    }
}

fn sort_order(order: SortOrder) -> Order {
    match order {
        SortOrder::Asc => Order::Asc,
        SortOrder::Desc => Order::Desc,
    }
}

#[async_trait]
impl NoteRepositoryInterface for NoteRepository {
    async fn create_note(&self, new_note: NewNote) -> DomainResult<Note> {
        let now = Utc::now();

        let active = note::ActiveModel {
            id: NotSet,
            title: Set(new_note.title),
            content: Set(new_note.content),
            category: Set(new_note.category),
            user_id: Set(new_note.user_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active.insert(&self.db).await?;
        Ok(note_model_to_domain(model))
    }

    async fn list_notes(&self, user_id: i32, query: NoteQuery) -> DomainResult<Vec<Note>> {
        let mut select = note::Entity::find().filter(note::Column::UserId.eq(user_id));

        if let Some(ref category) = query.category {
            select = select.filter(note::Column::Category.eq(category.as_str()));
        }

        if let Some(ref search) = query.search {
            select = select.filter(
                Condition::any()
                    .add(note::Column::Title.contains(search.as_str()))
                    .add(note::Column::Content.contains(search.as_str())),
            );
        }

        let order = sort_order(query.order);
        let models = select
            .order_by(sort_column(query.sort), order.clone())
            .order_by(note::Column::Id, order)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(note_model_to_domain).collect())
    }

    async fn find_note(&self, user_id: i32, id: i32) -> DomainResult<Option<Note>> {
        Ok(self.find_model(user_id, id).await?.map(note_model_to_domain))
    }

    async fn list_summaries(&self, user_id: i32) -> DomainResult<Vec<NoteSummary>> {
        let models = note::Entity::find()
            .filter(note::Column::UserId.eq(user_id))
            .order_by_desc(note::Column::CreatedAt)
            .order_by_desc(note::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models
            .into_iter()
            .map(|m| NoteSummary::from(note_model_to_domain(m)))
            .collect())
    }

    async fn update_note(
        &self,
        user_id: i32,
        id: i32,
        changes: NoteChanges,
    ) -> DomainResult<Option<Note>> {
        let Some(existing) = self.find_model(user_id, id).await? else {
            return Ok(None);
        };

        let mut active: note::ActiveModel = existing.into();

        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(content) = changes.content {
            active.content = Set(content);
        }
        if let Some(category) = changes.category {
            active.category = Set(category);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&self.db).await?;
        Ok(Some(note_model_to_domain(updated)))
    }

    async fn delete_note(&self, user_id: i32, id: i32) -> DomainResult<bool> {
        let result = note::Entity::delete_many()
            .filter(note::Column::Id.eq(id))
            .filter(note::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewUser, UserRepositoryInterface};
    use crate::infrastructure::crypto::PasswordHasher;
    use crate::infrastructure::database::{test_database, UserRepository};

    struct Fixture {
        users: UserRepository,
        notes: NoteRepository,
        alice: i32,
        bob: i32,
    }

    async fn fixture() -> Fixture {
        let db = test_database().await;
        let users = UserRepository::new(db.clone(), PasswordHasher::with_cost(4));
        let notes = NoteRepository::new(db);

        let mut ids = Vec::new();
        for name in ["alice", "bob"] {
            let user = users
                .create_user(NewUser {
                    username: name.into(),
                    email: format!("{}@x.com", name),
                    password: "password1".into(),
                })
                .await
                .unwrap();
            ids.push(user.id);
        }

        Fixture {
            users,
            notes,
            alice: ids[0],
            bob: ids[1],
        }
    }

    fn note(user_id: i32, title: &str, content: &str, category: &str) -> NewNote {
        NewNote {
            user_id,
            title: title.into(),
            content: content.into(),
            category: category.into(),
        }
    }

    #[tokio::test]
    async fn notes_are_scoped_to_owner() {
        let f = fixture().await;
        let mine = f
            .notes
            .create_note(note(f.alice, "Groceries", "milk", "General"))
            .await
            .unwrap();

        assert!(f.notes.find_note(f.alice, mine.id).await.unwrap().is_some());
        assert!(f.notes.find_note(f.bob, mine.id).await.unwrap().is_none());
        assert!(f
            .notes
            .update_note(
                f.bob,
                mine.id,
                NoteChanges {
                    title: Some("stolen".into()),
                    ..Default::default()
                }
            )
            .await
            .unwrap()
            .is_none());
        assert!(!f.notes.delete_note(f.bob, mine.id).await.unwrap());
        assert!(f.notes.delete_note(f.alice, mine.id).await.unwrap());
        assert!(f.notes.find_note(f.alice, mine.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_filters_by_category_and_search() {
        let f = fixture().await;
        f.notes
            .create_note(note(f.alice, "Standup", "sync with team", "Work"))
            .await
            .unwrap();
        f.notes
            .create_note(note(f.alice, "Groceries", "milk and eggs", "Home"))
            .await
            .unwrap();
        f.notes
            .create_note(note(f.alice, "Team dinner", "book table", "Home"))
            .await
            .unwrap();
        f.notes
            .create_note(note(f.bob, "Team offsite", "plan", "Work"))
            .await
            .unwrap();

        let home = f
            .notes
            .list_notes(
                f.alice,
                NoteQuery {
                    category: Some("Home".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(home.len(), 2);

        let team = f
            .notes
            .list_notes(
                f.alice,
                NoteQuery {
                    search: Some("team".into()),
                    sort: NoteSortField::Title,
                    order: SortOrder::Asc,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let titles: Vec<_> = team.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Standup", "Team dinner"]);
    }

    #[tokio::test]
    async fn update_touches_only_given_fields() {
        let f = fixture().await;
        let created = f
            .notes
            .create_note(note(f.alice, "Draft", "body", "General"))
            .await
            .unwrap();

        let updated = f
            .notes
            .update_note(
                f.alice,
                created.id,
                NoteChanges {
                    category: Some("Ideas".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "Draft");
        assert_eq!(updated.content, "body");
        assert_eq!(updated.category, "Ideas");
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn deleting_user_cascades_to_notes() {
        let f = fixture().await;
        let created = f
            .notes
            .create_note(note(f.alice, "Temp", "x", "General"))
            .await
            .unwrap();

        f.users.delete_user(f.alice).await.unwrap();

        assert!(f.notes.find_note(f.alice, created.id).await.unwrap().is_none());
        assert!(f.notes.list_summaries(f.alice).await.unwrap().is_empty());
    }
}
