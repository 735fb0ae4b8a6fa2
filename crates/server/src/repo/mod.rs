pub mod calendario;
pub mod comunicacoes;
pub mod contatos;
pub mod empresas;
pub mod negocios;
pub mod pipelines;
pub mod propostas;
pub mod sessions;
pub mod tarefas;
pub mod users;
