pub mod dock;
pub mod example;
