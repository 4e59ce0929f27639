pub const SKU_COLUMNS: [&str; 9] = [
    "#",
    "SKU",
    "Category",
    "Sub Category",
    "Status",
    "Image Processing Status",
    "Updated At",
    "Filtered Images",
    "Search Results",
];
pub const STATUS_COLUMNS: [&str; 3] = ["Status", "Count", "%"];

pub const LOADING_SKUS: &str = "Loading SKU data...";
pub const LOADING_STATS: &str = "Loading stats...";
pub const LOADING_WORKFLOWS: &str = "Loading workflows...";
pub const RETRY_HINT: &str = "type `refresh` to retry";

pub const EMPTY_SKUS: &str = "No SKU data available";
pub const EMPTY_STATS: &str = "No stats data available";
pub const EMPTY_WORKFLOWS: &str = "No workflows found";
pub const EMPTY_ATTRIBUTES: &str = "No attributes available";
pub const EMPTY_CUSTOM_ATTRIBUTES: &str = "No custom attributes available";
pub const EMPTY_IMAGES: &str = "No images available";
pub const EMPTY_FILTERED_IMAGES: &str = "No filtered images available";
pub const EMPTY_WEBSITES: &str = "No scraped websites available";
pub const NO_PRODUCT_INFORMATION: &str = "No product information";
