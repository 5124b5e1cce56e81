use crate::app::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DisplayObjectId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillStyle {
    pub color: u32,
    pub alpha: f32,
}

impl FillStyle {
    pub const fn new(color: u32, alpha: f32) -> Self {
        Self { color, alpha }
    }

    pub fn rgba(&self) -> [u8; 4] {
        [
            ((self.color >> 16) & 0xff) as u8,
            ((self.color >> 8) & 0xff) as u8,
            (self.color & 0xff) as u8,
            (self.alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
        ]
    }
}

impl Default for FillStyle {
    fn default() -> Self {
        Self::new(0xffffff, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub texture_key: String,
    pub position: Vec2,
    pub scale: Vec2,
    pub flip_x: bool,
    pub frame: u32,
    pub visible: bool,
}

impl Image {
    pub fn new(texture_key: &str, position: Vec2) -> Self {
        Self {
            texture_key: texture_key.to_string(),
            position,
            scale: Vec2::new(1.0, 1.0),
            flip_x: false,
            frame: 0,
            visible: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graphics {
    fill: FillStyle,
    rects: Vec<(Rect, FillStyle)>,
}

impl Graphics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fill_style(&mut self, color: u32, alpha: f32) -> &mut Self {
        self.fill = FillStyle::new(color, alpha);
        self
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) -> &mut Self {
        self.rects.push((Rect::new(x, y, width, height), self.fill));
        self
    }

    pub fn clear(&mut self) -> &mut Self {
        self.rects.clear();
        self
    }

    pub fn rects(&self) -> &[(Rect, FillStyle)] {
        &self.rects
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub text: String,
    pub position: Vec2,
    pub origin: Vec2,
    pub color: u32,
    pub size_px: u32,
}

impl Text {
    pub fn new(text: &str, position: Vec2, size_px: u32) -> Self {
        Self {
            text: text.to_string(),
            position,
            origin: Vec2::new(0.0, 0.0),
            color: 0xffffff,
            size_px,
        }
    }

    pub fn with_origin(mut self, x: f32, y: f32) -> Self {
        self.origin = Vec2::new(x, y);
        self
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayObject {
    Image(Image),
    Graphics(Graphics),
    Text(Text),
}

#[derive(Debug, Default)]
pub struct DisplayList {
    next_id: u64,
    objects: Vec<(DisplayObjectId, DisplayObject)>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, object: DisplayObject) -> DisplayObjectId {
        let id = DisplayObjectId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.objects.push((id, object));
        id
    }

    pub fn add_image(&mut self, image: Image) -> DisplayObjectId {
        self.add(DisplayObject::Image(image))
    }

    pub fn add_graphics(&mut self) -> DisplayObjectId {
        self.add(DisplayObject::Graphics(Graphics::new()))
    }

    pub fn add_text(&mut self, text: Text) -> DisplayObjectId {
        self.add(DisplayObject::Text(text))
    }

    pub fn get(&self, id: DisplayObjectId) -> Option<&DisplayObject> {
        self.objects
            .iter()
            .find(|(object_id, _)| *object_id == id)
            .map(|(_, object)| object)
    }

    pub fn get_mut(&mut self, id: DisplayObjectId) -> Option<&mut DisplayObject> {
        self.objects
            .iter_mut()
            .find(|(object_id, _)| *object_id == id)
            .map(|(_, object)| object)
    }

    pub fn image(&self, id: DisplayObjectId) -> Option<&Image> {
        match self.get(id)? {
            DisplayObject::Image(image) => Some(image),
            _ => None,
        }
    }

    pub fn image_mut(&mut self, id: DisplayObjectId) -> Option<&mut Image> {
        match self.get_mut(id)? {
            DisplayObject::Image(image) => Some(image),
            _ => None,
        }
    }

    pub fn graphics_mut(&mut self, id: DisplayObjectId) -> Option<&mut Graphics> {
        match self.get_mut(id)? {
            DisplayObject::Graphics(graphics) => Some(graphics),
            _ => None,
        }
    }

    pub fn destroy(&mut self, id: DisplayObjectId) -> bool {
        let before = self.objects.len();
        self.objects.retain(|(object_id, _)| *object_id != id);
        self.objects.len() != before
    }

    pub fn contains(&self, id: DisplayObjectId) -> bool {
        self.get(id).is_some()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DisplayObjectId, &DisplayObject)> {
        self.objects.iter().map(|(id, object)| (*id, object))
    }
}
