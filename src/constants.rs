pub const DEFAULT_OUTPUT_PATH: &str = "output/generated_image.png";
pub const DEFAULT_RATE_LIMIT_SECS: u64 = 20;
pub const BASE64_PREVIEW_CHARS: usize = 100;

pub const DEFAULT_REFERENCE_IMAGES: [&str; 4] = [
    "https://as1.ftcdn.net/v2/jpg/02/36/99/22/1000_F_236992283_sNOxCVQeFLd5pdqaKGh8DRGMZy7P4XKm.jpg",
    "https://as2.ftcdn.net/v2/jpg/03/03/62/45/1000_F_303624505_u0bFT1Rnoj8CMUSs8wMCwoKlnWlh5Jiq.jpg",
    "https://plus.unsplash.com/premium_photo-1694819488591-a43907d1c5cc?fm=jpg&q=60&w=3000",
    "https://hips.hearstapps.com/hmg-prod/images/gettyimages-1094874726.png?crop=1.00xw:0.753xh;0,0.161xh&resize=1200:*",
];

pub const DEFAULT_INSTRUCTION: &str = "Create a cinematic fantasy landscape with: \
1. The shot composition from the first reference image \
2. Characters from the other images in similar poses \
3. Background from the last image \
4. Vivid sunset lighting and colors";
