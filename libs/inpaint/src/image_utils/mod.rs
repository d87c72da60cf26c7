mod utils;

pub use utils::MASK_THRESHOLD;
pub use utils::decode_rgb;
pub use utils::decode_luma;
pub use utils::binarize_mask;
pub use utils::encode_png;
pub use utils::calculate_image_difference_rgb;
pub use utils::images_differ_rgb;
