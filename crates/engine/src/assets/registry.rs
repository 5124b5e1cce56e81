use std::collections::HashMap;

pub const PLACEHOLDER_TEXTURE_SIZE_PX: u32 = 32;
const PLACEHOLDER_COLOR_A: [u8; 4] = [255, 0, 255, 255];
const PLACEHOLDER_COLOR_B: [u8; 4] = [0, 0, 0, 255];
const PLACEHOLDER_CHECKER_PX: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameLayout {
    Single,
    Grid {
        frame_width: u32,
        frame_height: u32,
        columns: u32,
        rows: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone)]
pub struct Texture {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
    layout: FrameLayout,
    placeholder: bool,
}

impl Texture {
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return None;
        }
        Some(Self {
            width,
            height,
            rgba,
            layout: FrameLayout::Single,
            placeholder: false,
        })
    }

    pub fn placeholder() -> Self {
        let size = PLACEHOLDER_TEXTURE_SIZE_PX;
        let mut rgba = Vec::with_capacity((size * size * 4) as usize);
        for y in 0..size {
            for x in 0..size {
                let even = ((x / PLACEHOLDER_CHECKER_PX) + (y / PLACEHOLDER_CHECKER_PX)) % 2 == 0;
                rgba.extend_from_slice(if even {
                    &PLACEHOLDER_COLOR_A
                } else {
                    &PLACEHOLDER_COLOR_B
                });
            }
        }
        Self {
            width: size,
            height: size,
            rgba,
            layout: FrameLayout::Single,
            placeholder: true,
        }
    }

    pub fn with_frame_grid(mut self, frame_width: u32, frame_height: u32) -> Option<Self> {
        if frame_width == 0 || frame_height == 0 {
            return None;
        }
        let columns = self.width / frame_width;
        let rows = self.height / frame_height;
        if columns == 0 || rows == 0 {
            return None;
        }
        self.layout = FrameLayout::Grid {
            frame_width,
            frame_height,
            columns,
            rows,
        };
        Some(self)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub fn layout(&self) -> FrameLayout {
        self.layout
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    pub fn frame_count(&self) -> u32 {
        match self.layout {
            FrameLayout::Single => 1,
            FrameLayout::Grid { columns, rows, .. } => columns * rows,
        }
    }

    pub fn frame_size(&self) -> (u32, u32) {
        match self.layout {
            FrameLayout::Single => (self.width, self.height),
            FrameLayout::Grid {
                frame_width,
                frame_height,
                ..
            } => (frame_width, frame_height),
        }
    }

    pub fn frame_rect(&self, index: u32) -> Option<FrameRect> {
        match self.layout {
            FrameLayout::Single if index == 0 => Some(FrameRect {
                x: 0,
                y: 0,
                width: self.width,
                height: self.height,
            }),
            FrameLayout::Single => None,
            FrameLayout::Grid {
                frame_width,
                frame_height,
                columns,
                rows,
            } => {
                if index >= columns * rows {
                    return None;
                }
                Some(FrameRect {
                    x: (index % columns) * frame_width,
                    y: (index / columns) * frame_height,
                    width: frame_width,
                    height: frame_height,
                })
            }
        }
    }
}

#[derive(Debug)]
pub struct AssetRegistry {
    textures: HashMap<String, Texture>,
    placeholder: Texture,
}

impl Default for AssetRegistry {
    fn default() -> Self {
        Self {
            textures: HashMap::new(),
            placeholder: Texture::placeholder(),
        }
    }
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, texture: Texture) -> Option<Texture> {
        self.textures.insert(key.to_string(), texture)
    }

    pub fn get(&self, key: &str) -> Option<&Texture> {
        self.textures.get(key)
    }

    pub fn get_or_placeholder(&self, key: &str) -> &Texture {
        self.textures.get(key).unwrap_or(&self.placeholder)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.textures.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.textures.keys().map(String::as_str)
    }

    pub fn frame_size_or_placeholder(&self, key: &str) -> (u32, u32) {
        self.textures
            .get(key)
            .map(Texture::frame_size)
            .unwrap_or((PLACEHOLDER_TEXTURE_SIZE_PX, PLACEHOLDER_TEXTURE_SIZE_PX))
    }
}
