use std::fmt::Display;

/// Fixed column layout of the project sheet, 1-based like the sheet itself.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    ProjectName = 1,
    Location,
    Address,
    Label,
    QuoteSent,
    ReachedOut,
    TotalCogs,
    Customer,
    Phone,
    Email,
    BuildSize,
    ReceivedDetails,
    ZipCode,
    ProjectType,
    ProjectSqft,
    ReceivedQuote,
    ErectingLabor,
    ConcreteLabor,
    QuoteMaterial,
    SalesTax,
    QuoteWithTax,
    DeliveredQuote,
    QuoteAccepted,
    DepositPaid,
    DrawingsStatus,
    EstMetalDate,
    DoorOrderDate,
    EstDoorDate,
    MetalProduction,
    MetalDelivery,
    DoorDelivery,
    FinalAch,
    ContractorDate,
    JobStatus,
    Comments,
}

impl Column {
    pub fn index(self) -> usize {
        self as usize
    }

    /// Header text as it appears in the workbook.
    pub fn header(self) -> &'static str {
        match self {
            Column::ProjectName => "Project Name",
            Column::Location => "Location",
            Column::Address => "Project Address",
            Column::Label => "Project Label",
            Column::QuoteSent => "Quote Sent",
            Column::ReachedOut => "Reached Out",
            Column::TotalCogs => "Total COGs",
            Column::Customer => "Customer",
            Column::Phone => "Phone",
            Column::Email => "Email",
            Column::BuildSize => "Build Size",
            Column::ReceivedDetails => "Received Project Details",
            Column::ZipCode => "Zip Code",
            Column::ProjectType => "Project Type",
            Column::ProjectSqft => "Project SQFT",
            Column::ReceivedQuote => "Received Quote Drawings",
            Column::ErectingLabor => "Erecting Labor",
            Column::ConcreteLabor => "Concrete Labor",
            Column::QuoteMaterial => "Our Quote Material Only",
            Column::SalesTax => "Sales Tax %",
            Column::QuoteWithTax => "Our Quote With Tax",
            Column::DeliveredQuote => "Delivered Customer Quote",
            Column::QuoteAccepted => "Quote Accepted/Declined",
            Column::DepositPaid => "Deposit Paid",
            Column::DrawingsStatus => "Engineered Drawings Status",
            Column::EstMetalDate => "Estimated Metal Delivery Date",
            Column::DoorOrderDate => "Door Order Submitted Date",
            Column::EstDoorDate => "Estimated Door Delivery Date",
            Column::MetalProduction => "Metal Production",
            Column::MetalDelivery => "Metal Delivery",
            Column::DoorDelivery => "Door Delivery",
            Column::FinalAch => "Final ACH Payment",
            Column::ContractorDate => "Contractor Start Date",
            Column::JobStatus => "Job Status",
            Column::Comments => "Comments",
        }
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.header())
    }
}
