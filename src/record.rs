//! Genealogy records: one [`Person`] per spreadsheet row.

/// One raw spreadsheet row, fields in [`Column`] order.
pub type RawRow = Vec<String>;

/// Fixed positional schema of the genealogy sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Name = 0,
    Surname,
    DateOfBirth,
    Birthplace,
    DateOfDeath,
    Deathplace,
    Gender,
    Father,
    Mother,
    Details,
}

impl Column {
    pub const COUNT: usize = 10;

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Position of a person inside the normalized collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PersonId(pub usize);

impl std::fmt::Display for PersonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fields are copied verbatim; consumers trim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Person {
    pub name: String,
    pub surname: String,
    pub date_of_birth: String,
    pub birthplace: String,
    pub date_of_death: String,
    pub deathplace: String,
    pub gender: String,
    pub father_fullname: String,
    pub mother_fullname: String,
    pub details: String,
}

impl Person {
    /// Short rows leave the missing trailing fields empty.
    pub fn from_row(row: &[String]) -> Self {
        let field = |column: Column| row.get(column.index()).cloned().unwrap_or_default();
        Self {
            name: field(Column::Name),
            surname: field(Column::Surname),
            date_of_birth: field(Column::DateOfBirth),
            birthplace: field(Column::Birthplace),
            date_of_death: field(Column::DateOfDeath),
            deathplace: field(Column::Deathplace),
            gender: field(Column::Gender),
            father_fullname: field(Column::Father),
            mother_fullname: field(Column::Mother),
            details: field(Column::Details),
        }
    }

    /// `"name surname"`, the form parent columns use to refer to a person.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name.trim(), self.surname.trim())
            .trim()
            .to_string()
    }

    /// Symbol shown next to the name in flowchart labels.
    pub fn gender_symbol(&self) -> Option<String> {
        match self.gender.trim() {
            "" => None,
            "M" | "m" => Some("♂".to_string()),
            "F" | "f" => Some("♀".to_string()),
            other => Some(other.to_string()),
        }
    }
}

/// Drops the header row and maps every remaining row to a [`Person`].
pub fn normalize(rows: &[RawRow]) -> Vec<Person> {
    rows.iter().skip(1).map(|row| Person::from_row(row)).collect()
}

#[cfg(test)]
pub(crate) fn person(name: &str, surname: &str, born: &str, father: &str, mother: &str) -> Person {
    Person {
        name: name.to_string(),
        surname: surname.to_string(),
        date_of_birth: born.to_string(),
        father_fullname: father.to_string(),
        mother_fullname: mother.to_string(),
        ..Default::default()
    }
}
