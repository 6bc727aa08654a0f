use crate::book::Book;

/// True when the book can currently be lent out.
pub fn is_available(book: &Book) -> bool {
    book.available
}

/// The available subset, in the original order.
pub fn available(books: &[Book]) -> Vec<Book> {
    books.iter().filter(|b| is_available(b)).cloned().collect()
}
