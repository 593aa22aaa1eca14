pub mod todo_row;
