pub const INSERT_JOB: &str = "
    INSERT INTO jobs (title, salary, equity, company_handle)
    VALUES (?1, ?2, ?3, ?4)
";

pub const SELECT_JOBS: &str = "
    SELECT id, title, salary, equity, company_handle
    FROM jobs
";

pub const GET_JOB_BY_TITLE: &str = "
    SELECT id, title, salary, equity, company_handle
    FROM jobs
    WHERE title = ?1
";

pub const DELETE_JOB: &str = "
    DELETE
    FROM jobs
    WHERE title = ?1
";
