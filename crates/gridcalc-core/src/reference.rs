use std::fmt;

/// Zero-based cell coordinate, written `A1` in formulas
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub const fn new(row: usize, col: usize) -> Self {
        CellRef { row, col }
    }

    /// Parse A1 notation (`"B3"` -> row 2, col 1).
    ///
    /// Only uppercase column letters followed by a 1-based row number are
    /// accepted. Anything else returns `None`.
    pub fn parse(notation: &str) -> Option<Self> {
        let split = notation.find(|c: char| !c.is_ascii_uppercase())?;
        let (letters, digits) = notation.split_at(split);

        if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let col = col_from_label(letters)?;
        let row: usize = digits.parse().ok()?;

        if row == 0 {
            return None;
        }

        Some(CellRef { row: row - 1, col })
    }

    /// Convert to A1 notation (e.g., (0, 0) -> "A1")
    pub fn to_a1(&self) -> String {
        format!("{}{}", col_to_label(self.col), self.row + 1)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1())
    }
}

/// Convert column index (0-indexed) to label (A, B, ..., Z, AA, AB, ...)
pub fn col_to_label(col: usize) -> String {
    let mut label = String::new();
    let mut n = col + 1;

    while n > 0 {
        n -= 1;
        label.insert(0, char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }

    label
}

/// Convert column label (A=1 .. Z=26, AA=27, ...) to a zero-based index
pub fn col_from_label(label: &str) -> Option<usize> {
    let mut col: usize = 0;

    for c in label.chars() {
        if !c.is_ascii_uppercase() {
            return None;
        }
        col = col
            .checked_mul(26)?
            .checked_add(c as usize - 'A' as usize + 1)?;
    }

    col.checked_sub(1)
}

/// Base-26 successor of a column label ("A" -> "B", "Z" -> "AA", "AZ" -> "BA")
pub fn next_col_label(label: &str) -> Option<String> {
    col_from_label(label).map(|col| col_to_label(col + 1))
}

/// Rectangular span between two corner references, e.g. `A1:B4`.
///
/// Corners are kept as written: a range whose end lies before its start in
/// either axis expands to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeRef {
    pub start: CellRef,
    pub end: CellRef,
}

impl RangeRef {
    pub fn new(start: CellRef, end: CellRef) -> Self {
        RangeRef { start, end }
    }

    /// Parse `Ref1:Ref2` notation
    pub fn parse(notation: &str) -> Option<Self> {
        let (start, end) = notation.split_once(':')?;
        Some(RangeRef {
            start: CellRef::parse(start)?,
            end: CellRef::parse(end)?,
        })
    }

    pub fn is_reversed(&self) -> bool {
        self.start.row > self.end.row || self.start.col > self.end.col
    }

    /// Iterate the references column by column, rows ascending inside each column
    pub fn iter(&self) -> RangeRefIter {
        RangeRefIter {
            range: *self,
            current_row: self.start.row,
            current_col: self.start.col,
            done: self.is_reversed(),
        }
    }
}

impl fmt::Display for RangeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

impl IntoIterator for RangeRef {
    type Item = CellRef;
    type IntoIter = RangeRefIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Column-major iterator over the references in a range
pub struct RangeRefIter {
    range: RangeRef,
    current_row: usize,
    current_col: usize,
    done: bool,
}

impl Iterator for RangeRefIter {
    type Item = CellRef;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let cell = CellRef::new(self.current_row, self.current_col);

        self.current_row += 1;
        if self.current_row > self.range.end.row {
            self.current_row = self.range.start.row;
            self.current_col += 1;
            if self.current_col > self.range.end.col {
                self.done = true;
            }
        }

        Some(cell)
    }
}
