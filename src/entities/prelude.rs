pub use super::operacoes::Entity as Operacoes;
