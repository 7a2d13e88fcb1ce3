mod moods;
