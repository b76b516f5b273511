use super::item_service::{ItemService, ItemServiceImpl};
use crate::domain::{item::{CreateItem, Item, UpdateItem}, repository::ItemRepository};

/// Stands in for the file: `persisted` is what a reload sees, `items` is the
/// loaded copy.
#[derive(Default)]
struct InMemoryRepo {
    persisted: Vec<Item>,
    items: Vec<Item>,
    next_id: i32,
}

impl ItemRepository for InMemoryRepo {
    fn get_all(&mut self) -> Vec<Item> {
        self.items = self.persisted.clone();
        self.next_id = self.items.iter().map(|i| i.id).max().unwrap_or(0) + 1;
        self.items.clone()
    }
    fn create(&mut self, item: &mut Item) {
        item.id = self.next_id.max(1);
        self.next_id = item.id + 1;
        self.persisted.push(item.clone());
        self.items.push(item.clone());
    }
    fn get_by_id(&self, id: i32) -> Option<&Item> { self.items.iter().rev().find(|i| i.id == id) }
    fn get_by_id_mut(&mut self, id: i32) -> Option<&mut Item> { self.items.iter_mut().rev().find(|i| i.id == id) }
    fn update(&mut self, _item: &Item) { self.persisted = self.items.clone(); }
}

#[tokio::test]
async fn create_assigns_sequential_ids() {
    let service = ItemServiceImpl::new(InMemoryRepo::default());
    let a = service.create(CreateItem { text: "A".into(), complete: false }).await.unwrap();
    let b = service.create(CreateItem { text: "B".into(), complete: true }).await.unwrap();
    assert_eq!((a.id, b.id), (1, 2));
    assert!(b.complete);
}

#[tokio::test]
async fn get_reloads_before_lookup() {
    let repo = InMemoryRepo { persisted: vec![Item { id: 4, text: "on disk".into(), complete: false }], ..Default::default() };
    let service = ItemServiceImpl::new(repo);
    let got = service.get(4).await.unwrap().unwrap();
    assert_eq!(got.text, "on disk");
    assert!(service.get(5).await.unwrap().is_none());
}

#[tokio::test]
async fn update_applies_partial_changes_and_persists() {
    let service = ItemServiceImpl::new(InMemoryRepo::default());
    let created = service.create(CreateItem { text: "Walk dog".into(), complete: false }).await.unwrap();

    let updated = service
        .update(created.id, UpdateItem { text: None, complete: Some(true) })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.text, "Walk dog");
    assert!(updated.complete);

    let listed = service.list().await.unwrap();
    assert_eq!(listed, vec![updated]);
}

#[tokio::test]
async fn update_missing_item_is_none() {
    let service = ItemServiceImpl::new(InMemoryRepo::default());
    let res = service.update(9, UpdateItem { text: Some("x".into()), complete: None }).await.unwrap();
    assert!(res.is_none());
}

#[tokio::test]
async fn create_continues_after_existing_items() {
    let repo = InMemoryRepo { persisted: vec![Item { id: 1, text: "Buy milk".into(), complete: false }], ..Default::default() };
    let service = ItemServiceImpl::new(repo);
    let created = service.create(CreateItem { text: "Walk dog".into(), complete: false }).await.unwrap();
    assert_eq!(created.id, 2);
    assert_eq!(service.list().await.unwrap().len(), 2);
}
