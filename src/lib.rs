//! Событийное ядро покерной раздачи.
//!
//! Агрегаты стола и раздачи принимают команды и выпускают неизменяемые события,
//! процесс-менеджер (`flow`) реагирует на события и ведёт раздачу от старта
//! до выплаты банка, выдавая следующие команды.
//!
//! Слои:
//!   - `domain` – значения (карты, фишки, места);
//!   - `api` – команды, события, книги и проводной кодек;
//!   - `engine` – агрегаты, пересборка состояния, маршрутизация команд;
//!   - `flow` – процесс-менеджер раздачи и компенсации;
//!   - `infra` – конфиг, RNG, журнал событий, локальный координатор.

pub mod api;
pub mod domain;
pub mod engine;
pub mod flow;
pub mod infra;
