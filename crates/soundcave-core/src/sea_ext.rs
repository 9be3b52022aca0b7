use sea_orm::{EntityTrait, QuerySelect, Select};

use soundcave_domain::pagination::PageRequest;

/// Apply offset/limit from a [`PageRequest`] to a select.
///
/// Named `paged` so it does not collide with `PaginatorTrait::paginate`.
pub trait Paged {
    fn paged(self, page: PageRequest) -> Self;
}

impl<E> Paged for Select<E>
where
    E: EntityTrait,
{
    fn paged(self, page: PageRequest) -> Self {
        let page = page.clamped();
        self.offset(page.offset()).limit(page.limit)
    }
}
