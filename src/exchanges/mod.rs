pub mod cryptsy;
