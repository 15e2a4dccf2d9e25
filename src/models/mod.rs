//! Data models for the ToolRent console

pub mod client;
pub mod enums;
pub mod kardex;
pub mod loan;
pub mod report;
pub mod tariff;
pub mod tool;

// Re-export commonly used types
pub use client::{Client, ClientForm, CreateClient, EditClientForm, StatusChange, UpdateClient};
pub use enums::{ClientStatus, LoanStatus, MovementType, ToolStatus};
pub use kardex::{KardexForm, KardexMovement, KardexQuery};
pub use loan::{CreateLoan, Loan, LoanForm, ReturnForm, ReturnLoan};
pub use report::{DateRange, ReportForm, ReportKind, ReportQuery, ReportRows, TopTool};
pub use tariff::{Tariff, TariffForm};
pub use tool::{
    AdjustmentDirection, CreateTool, EditToolForm, StockAdjustment, StockAdjustmentForm, Tool, ToolForm,
    UpdateTool,
};
