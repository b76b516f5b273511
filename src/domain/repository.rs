use super::item::Item;

/// Read-all / append / rewrite-all seam over the item file.
///
/// None of these surface errors; implementations log failures and carry on.
pub trait ItemRepository: Send + 'static {
    /// Reloads every item from the backing file and returns them.
    fn get_all(&mut self) -> Vec<Item>;
    /// Assigns the next id to `item` and persists it.
    fn create(&mut self, item: &mut Item);
    /// Looks up an item among those last loaded. Last match wins.
    fn get_by_id(&self, id: i32) -> Option<&Item>;
    fn get_by_id_mut(&mut self, id: i32) -> Option<&mut Item>;
    /// Rewrites the backing file from the in-memory list.
    fn update(&mut self, item: &Item);
}
