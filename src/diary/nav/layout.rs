use crate::backend::Rect;

/// Half-width of a dialog box when the screen is wide enough.
const DIALOG_HALF_WIDTH: usize = 30;

/// Splits the width evenly between the menus, left to right, over rows `0..=height`.
///
/// The last menu takes whatever columns the integer division leaves over. Unknown names are
/// placed like the first menu.
pub fn menu_rect(menus: &[String], name: &str, width: usize, height: usize) -> Rect {
    let count = menus.len().max(1);
    let index = menus.iter().position(|m| m == name).unwrap_or(0);
    let step = width / count;

    let x0 = index * step;
    let x1 = if index == count - 1 {
        width
    } else {
        (index + 1) * step
    };
    Rect::new(x0, 0, x1, height)
}

/// A box centered on the screen, sized for `message`.
///
/// `max_x`/`max_y` are the largest usable column and row.
pub fn dialog_rect(message: &str, max_x: usize, max_y: usize) -> Rect {
    let line_count = message.split('\n').count();
    let (cx, cy) = (max_x / 2, max_y / 2);

    let half_width = DIALOG_HALF_WIDTH.min(cx);

    let mut half_height = line_count.div_ceil(2).max(1);
    if half_height > cy {
        half_height = cy;
    }
    let extra_row = usize::from(line_count % 2 == 0);
    // With the height capped, the extra row would fall below the last usable row.
    let y1 = (cy + half_height + extra_row).min(max_y);

    Rect::new(cx - half_width, cy - half_height, cx + half_width, y1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menus() -> Vec<String> {
        vec!["dates".to_string(), "sections".to_string()]
    }

    #[test]
    fn menus_split_the_width() {
        assert_eq!(menu_rect(&menus(), "dates", 79, 12), Rect::new(0, 0, 39, 12));
        assert_eq!(
            menu_rect(&menus(), "sections", 79, 12),
            Rect::new(39, 0, 79, 12)
        );
    }

    #[test]
    fn single_line_dialog() {
        let rect = dialog_rect("", 79, 23);
        assert_eq!(rect, Rect::new(9, 10, 69, 12));
        assert_eq!(rect.inner_size(), (59, 1));
    }

    #[test]
    fn even_line_count_gets_an_extra_row() {
        let rect = dialog_rect("Delete 01-01-2024?\n^Y Yes ^N No", 79, 23);
        assert_eq!(rect, Rect::new(9, 10, 69, 13));
        assert_eq!(rect.inner_size().1, 2);
    }

    #[test]
    fn odd_line_count_rounds_up() {
        let rect = dialog_rect("a\nb\nc", 79, 23);
        assert_eq!(rect, Rect::new(9, 9, 69, 13));
        assert_eq!(rect.inner_size().1, 3);
    }

    #[test]
    fn narrow_screens_cap_the_width() {
        let rect = dialog_rect("hi", 40, 23);
        assert_eq!(rect.x0, 0);
        assert_eq!(rect.x1, 40);
    }

    #[test]
    fn short_screens_cap_the_height() {
        let rect = dialog_rect("1\n2\n3\n4\n5\n6\n7", 79, 4);
        assert_eq!(rect.y0, 0);
        assert_eq!(rect.y1, 4);
    }

    #[test]
    fn capped_even_dialog_stays_on_screen() {
        let rect = dialog_rect("1\n2\n3\n4", 79, 4);
        assert_eq!(rect, Rect::new(9, 0, 69, 4));

        let rect = dialog_rect("Delete x?\n^Y Yes ^N No", 79, 2);
        assert_eq!(rect.y0, 0);
        assert_eq!(rect.y1, 2);
    }
}
