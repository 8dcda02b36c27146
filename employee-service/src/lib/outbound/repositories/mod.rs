pub mod account;
pub mod employee;
pub mod memory;

pub use account::PostgresAccountRepository;
pub use employee::PostgresEmployeeRepository;
pub use memory::InMemoryAccountRepository;
pub use memory::InMemoryEmployeeRepository;
